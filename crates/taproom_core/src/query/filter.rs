//! Filter resolution for list queries.
//!
//! # Responsibility
//! - Turn optional list parameters into one closed filter variant.
//! - Define the name-matching rule shared by every provider.
//!
//! # Invariants
//! - Resolution is pure; no I/O happens here.
//! - A blank name filter is treated as absent.
//! - Name matching is an unanchored substring test over `fold_case` output,
//!   the same fold the SQLite provider applies through `taproom_fold`.

use crate::model::beer::{Beer, BeerStyle};
use crate::model::customer::Customer;
use crate::model::validation::non_blank;

/// Store-level query selected for a catalog list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeerFilter {
    All,
    NameContains(String),
    Style(BeerStyle),
    NameContainsAndStyle(String, BeerStyle),
}

impl BeerFilter {
    /// Picks the query for the given parameters; the first matching row of
    /// the decision table wins.
    pub fn resolve(name: Option<&str>, style: Option<BeerStyle>) -> Self {
        match (non_blank(name), style) {
            (Some(name), Some(style)) => Self::NameContainsAndStyle(name.to_string(), style),
            (Some(name), None) => Self::NameContains(name.to_string()),
            (None, Some(style)) => Self::Style(style),
            (None, None) => Self::All,
        }
    }

    /// In-process evaluation of the same predicate the SQL provider runs.
    pub fn matches(&self, beer: &Beer) -> bool {
        match self {
            Self::All => true,
            Self::NameContains(name) => name_contains(&beer.name, name),
            Self::Style(style) => beer.style == *style,
            Self::NameContainsAndStyle(name, style) => {
                beer.style == *style && name_contains(&beer.name, name)
            }
        }
    }
}

/// Store-level query selected for a customer list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerFilter {
    All,
    NameContains(String),
}

impl CustomerFilter {
    pub fn resolve(name: Option<&str>) -> Self {
        match non_blank(name) {
            Some(name) => Self::NameContains(name.to_string()),
            None => Self::All,
        }
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        match self {
            Self::All => true,
            Self::NameContains(name) => name_contains(&customer.name, name),
        }
    }
}

/// Unicode lowercase fold applied to both sides of a name match.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Case-insensitive, unanchored substring test.
pub fn name_contains(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).contains(&fold_case(needle))
}
