//! Scripted walk through the desk operations against a local store.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use helpdesk_ai::Classifier;
use helpdesk_core::{Caller, Priority, Role, TicketStatus, UserAccount};
use helpdesk_desk::{NewTicket, TicketDesk, TicketFilter, TicketUpdate};
use helpdesk_notify::{HttpMailer, LogNotifier, Notifier};
use helpdesk_store::{MemoryDirectory, MemoryStore, TicketStore, UserDirectory};

/// Time given to background notifications before the process exits.
const NOTIFY_GRACE: Duration = Duration::from_millis(500);

const SAMPLE_TICKETS: [(&str, &str, Priority); 3] = [
    (
        "Export crashes",
        "Exporting a report throws an error after the progress bar fills",
        Priority::High,
    ),
    (
        "Charged twice",
        "My card shows two payment entries for the March invoice",
        Priority::Medium,
    ),
    (
        "Office hours",
        "When is the support team available on weekends?",
        Priority::Low,
    ),
];

pub async fn run(
    classifier: Classifier,
    store: Option<&Path>,
    mail_url: Option<String>,
    mail_from: String,
) -> anyhow::Result<()> {
    let store: Arc<dyn TicketStore> = match store {
        Some(path) => Arc::new(
            MemoryStore::open_persistent(path)
                .await
                .with_context(|| format!("opening ticket store {}", path.display()))?,
        ),
        None => Arc::new(MemoryStore::open()),
    };
    let notifier: Arc<dyn Notifier> = match mail_url {
        Some(url) => Arc::new(HttpMailer::new(url, mail_from)),
        None => Arc::new(LogNotifier),
    };

    let dana = UserAccount::new("demo-user", "Dana Reyes", "dana@example.com", Role::User);
    let sam = UserAccount::new("demo-admin", "Sam Okafor", "sam@example.com", Role::Admin);
    let users = MemoryDirectory::new();
    users.add_user(dana.clone()).await?;
    users.add_user(sam.clone()).await?;

    let desk = TicketDesk::new(Arc::new(classifier), store, Arc::new(users), notifier);
    let user = Caller::user(dana.to_user_ref());
    let admin = Caller::admin(sam.to_user_ref());

    let mut created = Vec::new();
    for (title, description, priority) in SAMPLE_TICKETS {
        let ticket = desk
            .create_ticket(
                &user,
                NewTicket {
                    title: title.into(),
                    description: description.into(),
                    priority,
                    attachment: None,
                },
            )
            .await?;
        eprintln!("created {} [{}] {}", ticket.id, ticket.category, ticket.title);
        created.push(ticket);
    }

    let first = &created[0].id;
    desk.add_comment(&user, first, "Happens with every CSV export.")
        .await?;

    let assignee = desk
        .list_admins(&admin)
        .await?
        .into_iter()
        .next()
        .context("no admin to assign")?;
    eprintln!("assigning {} to {}", first, assignee.name);
    desk.update_ticket(
        &admin,
        first,
        TicketUpdate {
            status: Some(TicketStatus::InProgress),
            assigned_to: Some(assignee.id),
            ..Default::default()
        },
    )
    .await?;

    let tickets = desk.list_tickets(&user, TicketFilter::default()).await?;
    println!("{}", serde_json::to_string_pretty(&tickets)?);

    tokio::time::sleep(NOTIFY_GRACE).await;
    Ok(())
}
