//! Structural validation results shared by all record kinds.
//!
//! # Invariants
//! - Validators collect every violation before returning; they never stop at
//!   the first failing field.
//! - An empty violation list is never returned as an error.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) const MSG_NOT_BLANK: &str = "must not be blank";
pub(crate) const MSG_NOT_NULL: &str = "must not be null";
pub(crate) const MSG_NOT_NEGATIVE: &str = "must be greater than or equal to 0";
pub(crate) const MSG_EMAIL: &str = "must be a well-formed email address";

/// One rejected field and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Non-empty set of violations reported by a structural validator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns whether `field` has at least one violation.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// Converts a collected set into a pass/fail outcome.
    pub fn into_result(self) -> Result<(), Self> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed:")?;
        for (index, violation) in self.violations.iter().enumerate() {
            let sep = if index == 0 { " " } else { "; " };
            write!(f, "{sep}{} {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

/// Returns `true` for `None`, empty and whitespace-only values.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |text| text.trim().is_empty())
}

/// Returns the value when it carries text, `None` when it is blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

pub(crate) fn max_length_message(max: usize) -> String {
    format!("size must be between 1 and {max}")
}
