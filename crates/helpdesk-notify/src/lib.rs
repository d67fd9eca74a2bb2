//! Notification layer: fire-and-forget messages to ticket creators and to
//! users resetting their password.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::HttpMailer;

use async_trait::async_trait;
use helpdesk_core::{Ticket, TicketStatus};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("mail relay returned {status}: {body}")]
    Relay { status: u16, body: String },
}

/// A plain-text message to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Message to a ticket's creator after the ticket changed.
    pub fn ticket_updated(ticket: &Ticket, status: TicketStatus) -> Self {
        Self {
            to: ticket.created_by.email.clone(),
            subject: "Ticket Updated".to_string(),
            body: format!(
                "Your ticket \"{}\" has been updated. New status: {}.",
                ticket.title, status
            ),
        }
    }

    /// Message carrying a freshly issued password-reset token.
    pub fn password_reset(email: &str, token: &str) -> Self {
        Self {
            to: email.to_string(),
            subject: "Password Reset".to_string(),
            body: format!("Reset token: {token}"),
        }
    }
}

/// Delivers notifications. Callers log failures rather than propagate them.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Notifier that only logs; used when no mail relay is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            to = %notification.to,
            subject = %notification.subject,
            "notification (not delivered, no mail relay configured)"
        );
        Ok(())
    }
}
