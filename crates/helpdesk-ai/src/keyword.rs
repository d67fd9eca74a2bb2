//! Deterministic keyword rules: the first, free stage of the chain.

use async_trait::async_trait;
use helpdesk_core::Category;

use crate::{ClassifyError, Source, Stage};

/// Rules in priority order. The first rule with any matching keyword wins.
const RULES: &[(Category, &[&str])] = &[
    (Category::TechnicalIssue, &["bug", "error"]),
    (Category::AccountIssue, &["account", "login"]),
    (Category::BillingIssue, &["billing", "payment"]),
];

/// Case-insensitive substring rules. Never yields `GeneralInquiry`; that is
/// left to later stages and the final fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordStage;

impl KeywordStage {
    pub fn new() -> Self {
        Self
    }

    pub fn match_rules(description: &str) -> Option<Category> {
        let lower = description.to_lowercase();
        RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(category, _)| *category)
    }
}

#[async_trait]
impl Stage for KeywordStage {
    fn source(&self) -> Source {
        Source::Keyword
    }

    fn is_remote(&self) -> bool {
        false
    }

    async fn attempt(&self, description: &str) -> Result<Category, ClassifyError> {
        Self::match_rules(description).ok_or(ClassifyError::NoConfidentMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technical_keywords() {
        assert_eq!(
            KeywordStage::match_rules("Found a BUG in the editor"),
            Some(Category::TechnicalIssue)
        );
        assert_eq!(
            KeywordStage::match_rules("Error 500 when saving"),
            Some(Category::TechnicalIssue)
        );
    }

    #[test]
    fn account_keywords() {
        assert_eq!(
            KeywordStage::match_rules("I can't log into my account"),
            Some(Category::AccountIssue)
        );
        assert_eq!(
            KeywordStage::match_rules("Login page loops"),
            Some(Category::AccountIssue)
        );
    }

    #[test]
    fn billing_keywords() {
        assert_eq!(
            KeywordStage::match_rules("Question about my Billing cycle"),
            Some(Category::BillingIssue)
        );
        assert_eq!(
            KeywordStage::match_rules("payment declined"),
            Some(Category::BillingIssue)
        );
    }

    #[test]
    fn technical_outranks_billing() {
        assert_eq!(
            KeywordStage::match_rules("billing page has a bug"),
            Some(Category::TechnicalIssue)
        );
    }

    #[test]
    fn account_outranks_billing() {
        assert_eq!(
            KeywordStage::match_rules("payment failed on my account"),
            Some(Category::AccountIssue)
        );
    }

    #[test]
    fn substring_matches_count() {
        // "debugging" contains "bug"; substring semantics are intended.
        assert_eq!(
            KeywordStage::match_rules("help debugging my setup"),
            Some(Category::TechnicalIssue)
        );
    }

    #[test]
    fn no_match() {
        assert_eq!(KeywordStage::match_rules(""), None);
        assert_eq!(KeywordStage::match_rules("asdkjalksdj"), None);
        assert_eq!(KeywordStage::match_rules("What are your opening hours?"), None);
    }

    #[tokio::test]
    async fn stage_reports_miss() {
        let err = KeywordStage::new().attempt("hello there").await.unwrap_err();
        assert!(err.is_miss());
    }
}
