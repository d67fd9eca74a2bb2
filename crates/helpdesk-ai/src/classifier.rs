//! The classification chain.
//!
//! Stages run in order, one at a time, and the first hit wins. Remote stages
//! run under a per-stage timeout. Nothing a stage does can make
//! [`Classifier::classify`] fail: misses and errors fall through, and
//! `GeneralInquiry` is returned when every stage misses.

use std::sync::Arc;
use std::time::Duration;

use helpdesk_core::Category;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    ClassifyError, Completer, DEFAULT_STAGE_TIMEOUT_MS, KeywordStage, LlmStage, RerankStage,
    Reranker, Source, Stage,
};

/// A category and the stage that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub source: Source,
}

impl ClassificationResult {
    fn fallback() -> Self {
        Self {
            category: Category::GeneralInquiry,
            source: Source::Fallback,
        }
    }
}

/// Ticket classifier. Build once at startup and share by reference.
pub struct Classifier {
    stages: Vec<Box<dyn Stage>>,
    stage_timeout: Duration,
}

/// Assembles a [`Classifier`]; stages run in the order they are added.
pub struct ClassifierBuilder {
    stages: Vec<Box<dyn Stage>>,
    stage_timeout: Duration,
}

impl Default for ClassifierBuilder {
    fn default() -> Self {
        Self {
            stages: Vec::new(),
            stage_timeout: Duration::from_millis(DEFAULT_STAGE_TIMEOUT_MS),
        }
    }
}

impl ClassifierBuilder {
    pub fn stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }

    pub fn keyword_rules(self) -> Self {
        self.stage(Box::new(KeywordStage::new()))
    }

    pub fn reranker(self, reranker: Arc<dyn Reranker>) -> Self {
        self.stage(Box::new(RerankStage::new(reranker)))
    }

    pub fn completer(self, completer: Arc<dyn Completer>) -> Self {
        self.stage(Box::new(LlmStage::new(completer)))
    }

    pub fn stage(mut self, stage: Box<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn build(self) -> Classifier {
        Classifier {
            stages: self.stages,
            stage_timeout: self.stage_timeout,
        }
    }
}

impl Classifier {
    pub fn builder() -> ClassifierBuilder {
        ClassifierBuilder::default()
    }

    /// Keyword rules only. No network access.
    pub fn keyword_only() -> Self {
        Self::builder().keyword_rules().build()
    }

    /// Build the chain described by `config`: keyword rules, then the
    /// reranker, then the LLM, each only when enabled and credentialed.
    #[cfg(feature = "http")]
    pub fn from_config(config: &crate::ClassifierConfig) -> Self {
        use tracing::info;

        use crate::{HttpCompleter, HttpReranker};

        let mut builder = Self::builder().stage_timeout(config.stage_timeout());

        if config.keyword_rules_enabled {
            builder = builder.keyword_rules();
        } else {
            info!("keyword rules disabled");
        }

        match config.active_reranker() {
            Some(r) => builder = builder.reranker(Arc::new(HttpReranker::new(r))),
            None if config.reranker.is_some() => {
                warn!("reranker configured without endpoint or credential, stage disabled")
            }
            None => {}
        }

        match config.active_llm() {
            Some(l) => builder = builder.completer(Arc::new(HttpCompleter::new(l))),
            None if config.llm.is_some() => {
                warn!("llm configured without endpoint or credential, stage disabled")
            }
            None => {}
        }

        let classifier = builder.build();
        info!(
            stages = ?classifier.stage_sources(),
            timeout_ms = config.stage_timeout_ms,
            "classifier ready"
        );
        classifier
    }

    /// Sources of the configured stages, in chain order.
    pub fn stage_sources(&self) -> Vec<Source> {
        self.stages.iter().map(|s| s.source()).collect()
    }

    pub fn stage_timeout(&self) -> Duration {
        self.stage_timeout
    }

    /// Classify a ticket description. Always returns one of the four
    /// categories.
    pub async fn classify(&self, description: &str) -> ClassificationResult {
        for stage in &self.stages {
            let source = stage.source();
            let outcome = if stage.is_remote() {
                tokio::time::timeout(self.stage_timeout, stage.attempt(description))
                    .await
                    .unwrap_or(Err(ClassifyError::RemoteTimeout(self.stage_timeout)))
            } else {
                stage.attempt(description).await
            };

            match outcome {
                Ok(category) => {
                    debug!(stage = %source, %category, "stage matched");
                    return ClassificationResult { category, source };
                }
                Err(e) if e.is_miss() => debug!(stage = %source, "stage missed"),
                Err(e) => warn!(stage = %source, error = %e, "stage failed, falling through"),
            }
        }

        debug!("no stage matched, using fallback category");
        ClassificationResult::fallback()
    }

    /// Shorthand for `classify(..).await.category`.
    pub async fn category(&self, description: &str) -> Category {
        self.classify(description).await.category
    }
}
