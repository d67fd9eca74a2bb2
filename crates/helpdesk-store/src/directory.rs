//! In-memory user directory.

use std::collections::HashMap;

use async_trait::async_trait;
use helpdesk_core::{Role, UserAccount};
use tokio::sync::RwLock;
use tracing::info;

use crate::{StoreError, UserDirectory};

/// Users keyed by id behind an async `RwLock`.
#[derive(Default)]
pub struct MemoryDirectory {
    users: RwLock<HashMap<String, UserAccount>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn add_user(&self, user: UserAccount) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let taken = users.contains_key(&user.id)
            || users
                .values()
                .any(|u| u.email.eq_ignore_ascii_case(&user.email));
        if taken {
            return Err(StoreError::DuplicateUser(user.email));
        }
        info!(user_id = %user.id, role = ?user.role, "user added");
        users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserAccount>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<UserAccount>, StoreError> {
        let users = self.users.read().await;
        let mut list: Vec<UserAccount> = users
            .values()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .cloned()
            .collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(list)
    }
}
