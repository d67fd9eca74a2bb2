//! Classifier configuration, read once at startup and never mutated.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_STAGE_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_RERANK_URL: &str = "https://api.cohere.com/v2/rerank";
pub const DEFAULT_RERANK_MODEL: &str = "rerank-english-v3.0";
pub const DEFAULT_LLM_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Endpoint, credential, and model for one remote stage.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteModelConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
}

impl RemoteModelConfig {
    /// A stage without an endpoint or credential is treated as not configured.
    pub fn is_usable(&self) -> bool {
        !self.endpoint.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

impl fmt::Debug for RemoteModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteModelConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// Which stages run, and how long each remote stage may take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub keyword_rules_enabled: bool,
    pub reranker: Option<RemoteModelConfig>,
    pub llm: Option<RemoteModelConfig>,
    pub stage_timeout_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            keyword_rules_enabled: true,
            reranker: None,
            llm: None,
            stage_timeout_ms: DEFAULT_STAGE_TIMEOUT_MS,
        }
    }
}

impl ClassifierConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn stage_timeout(&self) -> Duration {
        Duration::from_millis(self.stage_timeout_ms)
    }

    /// Reranker settings, if present and usable.
    pub fn active_reranker(&self) -> Option<&RemoteModelConfig> {
        self.reranker.as_ref().filter(|r| r.is_usable())
    }

    /// LLM settings, if present and usable.
    pub fn active_llm(&self) -> Option<&RemoteModelConfig> {
        self.llm.as_ref().filter(|l| l.is_usable())
    }
}
