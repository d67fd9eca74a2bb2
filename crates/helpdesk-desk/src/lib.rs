//! Ticket desk: the operations behind the helpdesk API.
//!
//! Ticket creation runs the description through the [`Classifier`]; updates
//! notify the ticket's creator. Authorization follows one rule set: admins
//! may act on any ticket and are the only ones who change status or
//! assignee, users may act on their own tickets. The user directory is
//! visible to admins only.

mod error;
mod request;

pub use error::DeskError;
pub use request::{NewTicket, TicketFilter, TicketUpdate};

use std::sync::Arc;

use chrono::Utc;
use helpdesk_ai::Classifier;
use helpdesk_core::{
    AdminSummary, Caller, Comment, Role, Ticket, TicketId, TicketStatus, UserAccount,
};
use helpdesk_notify::{Notification, Notifier};
use helpdesk_store::{StoreError, TicketEdit, TicketQuery, TicketStore, UserDirectory};
use tracing::{info, warn};

use request::require_text;

/// Shared service state. Cheap to clone; every field is behind an `Arc`.
#[derive(Clone)]
pub struct TicketDesk {
    classifier: Arc<Classifier>,
    store: Arc<dyn TicketStore>,
    users: Arc<dyn UserDirectory>,
    notifier: Arc<dyn Notifier>,
}

impl TicketDesk {
    pub fn new(
        classifier: Arc<Classifier>,
        store: Arc<dyn TicketStore>,
        users: Arc<dyn UserDirectory>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            classifier,
            store,
            users,
            notifier,
        }
    }

    /// File a new ticket on behalf of `caller`.
    pub async fn create_ticket(&self, caller: &Caller, req: NewTicket) -> Result<Ticket, DeskError> {
        require_text("title", &req.title)?;
        require_text("description", &req.description)?;

        let now = Utc::now();
        let attachment = match &req.attachment {
            Some(upload) => {
                upload.validate()?;
                Some(upload.storage_name(now.timestamp_millis()))
            }
            None => None,
        };

        let classification = self.classifier.classify(&req.description).await;

        let ticket = Ticket {
            id: TicketId::generate(),
            title: req.title,
            description: req.description,
            status: TicketStatus::Open,
            priority: req.priority,
            category: classification.category,
            assigned_to: None,
            created_by: caller.user.clone(),
            created_at: now,
            updated_at: now,
            comments: Vec::new(),
            attachment,
        };
        self.store.insert(ticket.clone()).await?;

        info!(
            ticket_id = %ticket.id,
            category = %classification.category,
            source = %classification.source,
            "ticket created"
        );
        Ok(ticket)
    }

    /// Admins see every ticket, users only their own.
    pub async fn list_tickets(
        &self,
        caller: &Caller,
        filter: TicketFilter,
    ) -> Result<Vec<Ticket>, DeskError> {
        let query = TicketQuery {
            created_by: (!caller.is_admin()).then(|| caller.user.id.clone()),
            status: filter.status,
            priority: filter.priority,
            search: filter.search.filter(|s| !s.trim().is_empty()),
        };
        Ok(self.store.list(&query).await?)
    }

    pub async fn get_ticket(&self, caller: &Caller, id: &TicketId) -> Result<Ticket, DeskError> {
        let ticket = self.load(id).await?;
        if !caller.can_access(&ticket) {
            return Err(DeskError::Forbidden("not your ticket"));
        }
        Ok(ticket)
    }

    /// Apply a partial update and notify the ticket's creator.
    ///
    /// Only the fields named in `update` are written; comments added while
    /// the update is in flight are kept.
    pub async fn update_ticket(
        &self,
        caller: &Caller,
        id: &TicketId,
        update: TicketUpdate,
    ) -> Result<Ticket, DeskError> {
        let current = self.load(id).await?;
        if update.needs_admin() && !caller.is_admin() {
            return Err(DeskError::Forbidden("only admins can change status or assignee"));
        }
        if !caller.can_access(&current) {
            return Err(DeskError::Forbidden("not your ticket"));
        }
        if update.is_empty() {
            return Err(DeskError::Validation("no fields to update".into()));
        }
        if let Some(title) = &update.title {
            require_text("title", title)?;
        }
        if let Some(description) = &update.description {
            require_text("description", description)?;
        }

        let edit: TicketEdit = Box::new(move |ticket: &mut Ticket| {
            if let Some(title) = update.title {
                ticket.title = title;
            }
            if let Some(description) = update.description {
                ticket.description = description;
            }
            if let Some(priority) = update.priority {
                ticket.priority = priority;
            }
            if let Some(status) = update.status {
                ticket.status = status;
            }
            if let Some(assignee) = update.assigned_to {
                ticket.assigned_to = Some(assignee);
            }
            ticket.updated_at = Utc::now();
        });
        let updated = self.store.update(id, edit).await.map_err(|e| match e {
            StoreError::NotFound(id) => DeskError::NotFound(id),
            other => other.into(),
        })?;
        info!(ticket_id = %updated.id, status = %updated.status, "ticket updated");

        // The message quotes the title the creator filed the ticket under.
        self.notify(Notification::ticket_updated(&current, updated.status));
        Ok(updated)
    }

    /// Admins may delete any ticket, users only their own. A ticket the caller
    /// may not delete is reported as not found.
    pub async fn delete_ticket(&self, caller: &Caller, id: &TicketId) -> Result<(), DeskError> {
        let allowed = match self.store.get(id).await? {
            Some(ticket) => caller.can_access(&ticket),
            None => false,
        };
        if !allowed || !self.store.delete(id).await? {
            return Err(DeskError::NotFound(id.clone()));
        }
        info!(ticket_id = %id, "ticket deleted");
        Ok(())
    }

    pub async fn add_comment(
        &self,
        caller: &Caller,
        id: &TicketId,
        text: &str,
    ) -> Result<Comment, DeskError> {
        require_text("comment", text)?;
        let ticket = self.load(id).await?;
        if !caller.can_access(&ticket) {
            return Err(DeskError::Forbidden("not your ticket"));
        }

        let comment = Comment {
            user_id: caller.user.id.clone(),
            text: text.to_string(),
            created_at: Utc::now(),
        };
        self.store.push_comment(id, comment.clone()).await?;
        Ok(comment)
    }

    pub async fn comments(&self, caller: &Caller, id: &TicketId) -> Result<Vec<Comment>, DeskError> {
        Ok(self.get_ticket(caller, id).await?.comments)
    }

    /// Every registered user. Admin only.
    pub async fn list_users(&self, caller: &Caller) -> Result<Vec<UserAccount>, DeskError> {
        require_admin(caller)?;
        Ok(self.users.list_users(None).await?)
    }

    /// Admins available as assignees. Admin only.
    pub async fn list_admins(&self, caller: &Caller) -> Result<Vec<AdminSummary>, DeskError> {
        require_admin(caller)?;
        let admins = self.users.list_users(Some(Role::Admin)).await?;
        Ok(admins.iter().map(AdminSummary::from).collect())
    }

    /// Mail a reset token issued by the auth layer to the account holder.
    pub async fn send_password_reset(&self, email: &str, token: &str) -> Result<(), DeskError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DeskError::UserNotFound(email.to_string()))?;
        info!(user_id = %user.id, "password reset requested");
        self.notify(Notification::password_reset(&user.email, token));
        Ok(())
    }

    async fn load(&self, id: &TicketId) -> Result<Ticket, DeskError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DeskError::NotFound(id.clone()))
    }

    /// Send in the background; delivery failures are logged only.
    fn notify(&self, notification: Notification) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier.send(&notification).await {
                warn!(to = %notification.to, error = %e, "notification failed");
            }
        });
    }
}

fn require_admin(caller: &Caller) -> Result<(), DeskError> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(DeskError::Forbidden("admins only"))
    }
}
