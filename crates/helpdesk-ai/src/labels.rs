//! Category descriptions handed to remote models.
//!
//! The reranker scores one passage per category, in [`Category::ALL`] order.
//! The LLM gets a prompt listing the canonical literals it must answer with.

use helpdesk_core::Category;

use crate::Prompt;

const SYSTEM_PROMPT: &str = "\
You are a support ticket triage assistant. \
Classify the ticket into exactly one category. \
Respond with the category name only, no punctuation or explanation.";

fn passage(category: Category) -> &'static str {
    match category {
        Category::TechnicalIssue => {
            "Technical issue: a bug, error, crash, outage, or a feature that is not working"
        }
        Category::AccountIssue => {
            "Account issue: login problems, password resets, locked or compromised accounts, profile changes"
        }
        Category::BillingIssue => {
            "Billing issue: payments, invoices, charges, refunds, subscriptions, or pricing"
        }
        Category::GeneralInquiry => {
            "General inquiry: questions, feedback, or requests that are not a technical, account, or billing problem"
        }
    }
}

/// Reranker passages, index-aligned with [`Category::ALL`].
pub fn category_passages() -> [&'static str; 4] {
    Category::ALL.map(passage)
}

/// Prompt asking a completion model for exactly one canonical category name.
pub fn classification_prompt(description: &str) -> Prompt {
    let allowed = Category::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user: format!(
            "Allowed categories: {allowed}\n\
             \n\
             Ticket description:\n\
             \"\"\"\n\
             {description}\n\
             \"\"\"\n\
             \n\
             Category:"
        ),
    }
}
