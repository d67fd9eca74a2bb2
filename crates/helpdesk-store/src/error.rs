use helpdesk_core::TicketId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ticket not found: {0}")]
    NotFound(TicketId),

    #[error("ticket already exists: {0}")]
    Duplicate(TicketId),

    #[error("user already exists: {0}")]
    DuplicateUser(String),

    #[error("snapshot i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
