use std::fmt;

use async_trait::async_trait;
use helpdesk_core::Category;
use serde::Serialize;

use crate::ClassifyError;

/// Which step of the chain produced a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Keyword,
    Reranker,
    Llm,
    Fallback,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Reranker => "reranker",
            Self::Llm => "llm",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step in the classification chain.
///
/// `attempt` returns a category on a hit. Any error, including
/// [`ClassifyError::NoConfidentMatch`], makes the chain move on.
#[async_trait]
pub trait Stage: Send + Sync {
    fn source(&self) -> Source;

    /// Remote stages run under the classifier's per-stage timeout.
    fn is_remote(&self) -> bool;

    async fn attempt(&self, description: &str) -> Result<Category, ClassifyError>;
}
