use helpdesk_core::{Priority, Ticket, TicketStatus};

/// Filter for [`TicketStore::list`](crate::TicketStore::list). Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketQuery {
    /// Restrict to tickets created by this user id.
    pub created_by: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
    /// Case-insensitive substring of the title or description.
    pub search: Option<String>,
}

impl TicketQuery {
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(owner) = &self.created_by
            && ticket.created_by.id != *owner
        {
            return false;
        }
        if self.status.is_some_and(|s| s != ticket.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != ticket.priority) {
            return false;
        }
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            if !ticket.title.to_lowercase().contains(&needle)
                && !ticket.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use helpdesk_core::{Category, TicketId, UserRef};

    fn ticket(owner: &str, title: &str, status: TicketStatus, priority: Priority) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: TicketId::generate(),
            title: title.into(),
            description: "Steps to reproduce attached".into(),
            status,
            priority,
            category: Category::TechnicalIssue,
            assigned_to: None,
            created_by: UserRef {
                id: owner.into(),
                name: owner.into(),
                email: format!("{owner}@example.com"),
            },
            created_at: now,
            updated_at: now,
            comments: Vec::new(),
            attachment: None,
        }
    }

    #[test]
    fn empty_query_matches_all() {
        let t = ticket("u1", "Crash", TicketStatus::Open, Priority::Low);
        assert!(TicketQuery::default().matches(&t));
    }

    #[test]
    fn owner_filter() {
        let t = ticket("u1", "Crash", TicketStatus::Open, Priority::Low);
        let q = TicketQuery {
            created_by: Some("u2".into()),
            ..Default::default()
        };
        assert!(!q.matches(&t));
    }

    #[test]
    fn status_and_priority_filters() {
        let t = ticket("u1", "Crash", TicketStatus::Closed, Priority::High);
        let q = TicketQuery {
            status: Some(TicketStatus::Closed),
            priority: Some(Priority::High),
            ..Default::default()
        };
        assert!(q.matches(&t));

        let q = TicketQuery {
            status: Some(TicketStatus::Open),
            ..Default::default()
        };
        assert!(!q.matches(&t));
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let t = ticket("u1", "Editor Crash", TicketStatus::Open, Priority::Medium);
        let by_title = TicketQuery {
            search: Some("crash".into()),
            ..Default::default()
        };
        let by_description = TicketQuery {
            search: Some("REPRODUCE".into()),
            ..Default::default()
        };
        let miss = TicketQuery {
            search: Some("invoice".into()),
            ..Default::default()
        };
        assert!(by_title.matches(&t));
        assert!(by_description.matches(&t));
        assert!(!miss.matches(&t));
    }
}
