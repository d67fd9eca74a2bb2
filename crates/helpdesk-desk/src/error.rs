use helpdesk_core::{AttachmentError, TicketId};
use helpdesk_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeskError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    #[error("ticket not found: {0}")]
    NotFound(TicketId),

    #[error("no user with email {0}")]
    UserNotFound(String),

    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl DeskError {
    /// Whether the caller can fix this by changing the request.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}
