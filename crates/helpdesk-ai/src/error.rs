use std::time::Duration;

use thiserror::Error;

/// Why a classification stage did not produce a category.
///
/// These never leave [`Classifier::classify`](crate::Classifier::classify);
/// they decide whether the chain falls through and what gets logged.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("no confident match")]
    NoConfidentMatch,

    #[error("remote call timed out after {0:?}")]
    RemoteTimeout(Duration),

    #[error("remote rejected credentials (status {0})")]
    RemoteAuth(u16),

    #[error("remote rate limited the request")]
    RateLimited,

    #[error("remote returned {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    #[error("malformed remote response: {0}")]
    RemoteMalformedResponse(String),

    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Transport(reqwest::Error),
}

impl ClassifyError {
    /// Map a non-success HTTP status onto the taxonomy.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::RemoteAuth(status),
            429 => Self::RateLimited,
            _ => Self::RemoteStatus { status, body },
        }
    }

    /// Whether this is an ordinary miss rather than a failure worth a warning.
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::NoConfidentMatch)
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for ClassifyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::RemoteMalformedResponse(e.to_string())
        } else {
            Self::Transport(e)
        }
    }
}

impl From<serde_json::Error> for ClassifyError {
    fn from(e: serde_json::Error) -> Self {
        Self::RemoteMalformedResponse(e.to_string())
    }
}
