//! The closed set of ticket categories.
//!
//! Every ticket carries exactly one of these. The order of [`Category::ALL`]
//! is canonical: remote rerankers receive passages in this order, and ties
//! between equal scores resolve to the earlier entry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ticket category assigned at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    TechnicalIssue,
    AccountIssue,
    BillingIssue,
    GeneralInquiry,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ticket category: {0:?}")]
pub struct ParseCategoryError(pub String);

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Category; 4] = [
        Category::TechnicalIssue,
        Category::AccountIssue,
        Category::BillingIssue,
        Category::GeneralInquiry,
    ];

    /// Canonical literal, as stored on tickets and expected from models.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TechnicalIssue => "TechnicalIssue",
            Self::AccountIssue => "AccountIssue",
            Self::BillingIssue => "BillingIssue",
            Self::GeneralInquiry => "GeneralInquiry",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TechnicalIssue => "Technical Issue",
            Self::AccountIssue => "Account Issue",
            Self::BillingIssue => "Billing Issue",
            Self::GeneralInquiry => "General Inquiry",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match against the canonical literals.
impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_canonical_literals() {
        for c in Category::ALL {
            assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
        }
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert!("technicalissue".parse::<Category>().is_err());
        assert!("Technical Issue".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn serde_uses_canonical_literal() {
        let json = serde_json::to_string(&Category::BillingIssue).unwrap();
        assert_eq!(json, "\"BillingIssue\"");
        let parsed: Category = serde_json::from_str("\"AccountIssue\"").unwrap();
        assert_eq!(parsed, Category::AccountIssue);
    }

    #[test]
    fn canonical_order() {
        assert_eq!(Category::ALL[0], Category::TechnicalIssue);
        assert_eq!(Category::ALL[3], Category::GeneralInquiry);
    }
}
