//! Storage layer: the `TicketStore` and `UserDirectory` traits and their
//! in-memory backends.

mod directory;
mod error;
mod memory;
mod query;

pub use directory::MemoryDirectory;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use query::TicketQuery;

use async_trait::async_trait;
use helpdesk_core::{Comment, Role, Ticket, TicketId, UserAccount};

/// In-place edit applied by [`TicketStore::update`].
pub type TicketEdit = Box<dyn FnOnce(&mut Ticket) + Send>;

/// Ticket persistence as seen by the desk.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Insert a new ticket. Fails with [`StoreError::Duplicate`] if the id exists.
    async fn insert(&self, ticket: Ticket) -> Result<(), StoreError>;

    async fn get(&self, id: &TicketId) -> Result<Option<Ticket>, StoreError>;

    /// Tickets matching `query`, oldest first.
    async fn list(&self, query: &TicketQuery) -> Result<Vec<Ticket>, StoreError>;

    /// Apply `edit` to the stored ticket atomically and return the result.
    ///
    /// The edit sees the current record, so fields it does not touch
    /// (comments in particular) keep whatever concurrent writers left there.
    async fn update(&self, id: &TicketId, edit: TicketEdit) -> Result<Ticket, StoreError>;

    /// Returns whether a ticket was removed.
    async fn delete(&self, id: &TicketId) -> Result<bool, StoreError>;

    /// Append to a ticket's comment thread.
    async fn push_comment(&self, id: &TicketId, comment: Comment) -> Result<(), StoreError>;
}

/// Registered users. Populated by the auth layer; read by admin views.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fails with [`StoreError::DuplicateUser`] if the id or email is taken.
    async fn add_user(&self, user: UserAccount) -> Result<(), StoreError>;

    async fn get_user(&self, id: &str) -> Result<Option<UserAccount>, StoreError>;

    /// Case-insensitive lookup by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError>;

    /// Every user, or only those with `role`, oldest first.
    async fn list_users(&self, role: Option<Role>) -> Result<Vec<UserAccount>, StoreError>;
}
