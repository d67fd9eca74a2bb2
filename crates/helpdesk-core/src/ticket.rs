//! Ticket records and the identities that act on them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Category;

/// Opaque ticket identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TicketId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TicketId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// A user as referenced from a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// The authenticated identity behind a desk operation.
///
/// Produced by the auth layer from a verified token; the desk only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user: UserRef,
    pub role: Role,
}

impl Caller {
    pub fn user(user: UserRef) -> Self {
        Self {
            user,
            role: Role::User,
        }
    }

    pub fn admin(user: UserRef) -> Self {
        Self {
            user,
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins may act on any ticket, users only on their own.
    pub fn can_access(&self, ticket: &Ticket) -> bool {
        self.is_admin() || ticket.created_by.id == self.user.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: Priority,
    pub category: Category,
    /// User id of the assigned admin, if any.
    pub assigned_to: Option<String>,
    pub created_by: UserRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Storage reference of the uploaded attachment.
    pub attachment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserRef {
        UserRef {
            id: "u-alice".into(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
        }
    }

    fn ticket_by(user: UserRef) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: TicketId::generate(),
            title: "Printer".into(),
            description: "Printer on fire".into(),
            status: TicketStatus::Open,
            priority: Priority::default(),
            category: Category::GeneralInquiry,
            assigned_to: None,
            created_by: user,
            created_at: now,
            updated_at: now,
            comments: Vec::new(),
            attachment: None,
        }
    }

    #[test]
    fn status_wire_names() {
        let json = serde_json::to_string(&TicketStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        let parsed: TicketStatus = serde_json::from_str("\"closed\"").unwrap();
        assert_eq!(parsed, TicketStatus::Closed);
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
        let parsed: Priority = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(parsed, Priority::High);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(TicketId::generate(), TicketId::generate());
    }

    #[test]
    fn owner_and_admin_can_access() {
        let ticket = ticket_by(alice());
        let bob = UserRef {
            id: "u-bob".into(),
            name: "Bob".into(),
            email: "bob@example.com".into(),
        };

        assert!(Caller::user(alice()).can_access(&ticket));
        assert!(!Caller::user(bob.clone()).can_access(&ticket));
        assert!(Caller::admin(bob).can_access(&ticket));
    }

    #[test]
    fn ticket_json_without_comments_field() {
        let ticket = ticket_by(alice());
        let mut value = serde_json::to_value(&ticket).unwrap();
        value.as_object_mut().unwrap().remove("comments");
        let parsed: Ticket = serde_json::from_value(value).unwrap();
        assert!(parsed.comments.is_empty());
        assert_eq!(parsed.category, Category::GeneralInquiry);
    }
}
