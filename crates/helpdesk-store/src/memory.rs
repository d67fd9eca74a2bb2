//! In-memory ticket store with optional JSON snapshotting.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use helpdesk_core::{Comment, Ticket, TicketId};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{StoreError, TicketEdit, TicketQuery, TicketStore};

/// Tickets held in a map behind an async `RwLock`.
///
/// Supports both in-memory (ephemeral) and persistent modes. Use
/// [`open`](Self::open) for the former and
/// [`open_persistent`](Self::open_persistent) to write a JSON snapshot after
/// every mutation and reload it on the next start.
pub struct MemoryStore {
    tickets: RwLock<HashMap<TicketId, Ticket>>,
    snapshot: Option<PathBuf>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::open()
    }
}

impl MemoryStore {
    pub fn open() -> Self {
        Self {
            tickets: RwLock::new(HashMap::new()),
            snapshot: None,
        }
    }

    /// Open a store backed by a snapshot file, loading it if it exists.
    pub async fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let tickets = if tokio::fs::try_exists(path).await? {
            let raw = tokio::fs::read(path).await?;
            let list: Vec<Ticket> = serde_json::from_slice(&raw)?;
            info!(count = list.len(), path = %path.display(), "loaded ticket snapshot");
            list.into_iter().map(|t| (t.id.clone(), t)).collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            tickets: RwLock::new(tickets),
            snapshot: Some(path.to_path_buf()),
        })
    }

    pub async fn len(&self) -> usize {
        self.tickets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tickets.read().await.is_empty()
    }

    /// Write the snapshot, if persistent. Called with the write lock held so
    /// snapshots land in mutation order.
    async fn persist(&self, tickets: &HashMap<TicketId, Ticket>) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(&sorted(tickets.values().cloned().collect()))?;
        let tmp = snapshot_tmp_path(path);
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        debug!(count = tickets.len(), path = %path.display(), "wrote ticket snapshot");
        Ok(())
    }

    /// Swap the entry for `id` (removing it when `next` is `None`), then
    /// persist. A failed write restores the previous entry, so memory never
    /// holds a change the snapshot does not.
    async fn commit(
        &self,
        tickets: &mut HashMap<TicketId, Ticket>,
        id: &TicketId,
        next: Option<Ticket>,
    ) -> Result<Option<Ticket>, StoreError> {
        let prev = match next {
            Some(ticket) => tickets.insert(id.clone(), ticket),
            None => tickets.remove(id),
        };
        if let Err(e) = self.persist(tickets).await {
            match prev {
                Some(ticket) => {
                    tickets.insert(id.clone(), ticket);
                }
                None => {
                    tickets.remove(id);
                }
            }
            return Err(e);
        }
        Ok(prev)
    }
}

/// Sibling of the snapshot used for the write-then-rename.
fn snapshot_tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn sorted(mut tickets: Vec<Ticket>) -> Vec<Ticket> {
    tickets.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    tickets
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn insert(&self, ticket: Ticket) -> Result<(), StoreError> {
        let mut tickets = self.tickets.write().await;
        if tickets.contains_key(&ticket.id) {
            return Err(StoreError::Duplicate(ticket.id));
        }
        let id = ticket.id.clone();
        self.commit(&mut tickets, &id, Some(ticket)).await?;
        Ok(())
    }

    async fn get(&self, id: &TicketId) -> Result<Option<Ticket>, StoreError> {
        Ok(self.tickets.read().await.get(id).cloned())
    }

    async fn list(&self, query: &TicketQuery) -> Result<Vec<Ticket>, StoreError> {
        let tickets = self.tickets.read().await;
        Ok(sorted(
            tickets.values().filter(|t| query.matches(t)).cloned().collect(),
        ))
    }

    async fn update(&self, id: &TicketId, edit: TicketEdit) -> Result<Ticket, StoreError> {
        let mut tickets = self.tickets.write().await;
        let mut ticket = tickets
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        edit(&mut ticket);
        // The id is the map key; an edit cannot move a ticket.
        ticket.id = id.clone();
        self.commit(&mut tickets, id, Some(ticket.clone())).await?;
        Ok(ticket)
    }

    async fn delete(&self, id: &TicketId) -> Result<bool, StoreError> {
        let mut tickets = self.tickets.write().await;
        if !tickets.contains_key(id) {
            return Ok(false);
        }
        self.commit(&mut tickets, id, None).await?;
        Ok(true)
    }

    async fn push_comment(&self, id: &TicketId, comment: Comment) -> Result<(), StoreError> {
        let mut tickets = self.tickets.write().await;
        let mut ticket = tickets
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        ticket.comments.push(comment);
        self.commit(&mut tickets, id, Some(ticket)).await?;
        Ok(())
    }
}
