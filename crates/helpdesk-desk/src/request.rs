//! Request payloads accepted by the desk.

use helpdesk_core::{AttachmentUpload, Priority, TicketStatus};
use serde::Deserialize;

use crate::DeskError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub attachment: Option<AttachmentUpload>,
}

/// Partial update. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TicketUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    /// Admin only.
    pub status: Option<TicketStatus>,
    /// Admin only.
    pub assigned_to: Option<String>,
}

impl TicketUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether the update touches fields reserved for admins.
    pub fn needs_admin(&self) -> bool {
        self.status.is_some() || self.assigned_to.is_some()
    }
}

/// Listing filters supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), DeskError> {
    if value.trim().is_empty() {
        return Err(DeskError::Validation(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ticket_defaults() {
        let t: NewTicket =
            serde_json::from_str(r#"{ "title": "Crash", "description": "It crashed" }"#).unwrap();
        assert_eq!(t.priority, Priority::Medium);
        assert!(t.attachment.is_none());
    }

    #[test]
    fn update_admin_fields() {
        let u: TicketUpdate = serde_json::from_str(r#"{ "status": "closed" }"#).unwrap();
        assert!(u.needs_admin());
        assert!(!u.is_empty());

        let u: TicketUpdate = serde_json::from_str(r#"{ "priority": "high" }"#).unwrap();
        assert!(!u.needs_admin());

        assert!(TicketUpdate::default().is_empty());
    }

    #[test]
    fn blank_text_rejected() {
        assert!(require_text("title", "  \n").is_err());
        assert!(require_text("title", "ok").is_ok());
    }
}
