//! Ticket classification: an ordered chain of stages from cheap keyword rules
//! to remote reranker and LLM calls, ending in a total fallback.

mod classifier;
mod config;
mod error;
mod keyword;
mod labels;
mod llm;
mod reranker;
mod stage;

pub use classifier::{ClassificationResult, Classifier, ClassifierBuilder};
pub use config::{
    ClassifierConfig, ConfigError, DEFAULT_LLM_MODEL, DEFAULT_LLM_URL, DEFAULT_RERANK_MODEL,
    DEFAULT_RERANK_URL, DEFAULT_STAGE_TIMEOUT_MS, RemoteModelConfig,
};
pub use error::ClassifyError;
pub use keyword::KeywordStage;
pub use labels::{category_passages, classification_prompt};
pub use llm::{Completer, LlmStage, Prompt};
pub use reranker::{RerankStage, Reranker};
pub use stage::{Source, Stage};

#[cfg(feature = "http")]
pub use llm::HttpCompleter;
#[cfg(feature = "http")]
pub use reranker::HttpReranker;
