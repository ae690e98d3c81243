//! Customer entry model.
//!
//! # Invariants
//! - Same server-managed field rules as `Beer`.
//! - `email`, when set, is non-blank and looks like `local@domain`.

use crate::model::validation::{
    is_blank, max_length_message, non_blank, ValidationErrors, MSG_EMAIL, MSG_NOT_BLANK,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CustomerId = Uuid;

pub const CUSTOMER_NAME_MAX_CHARS: usize = 255;
pub const CUSTOMER_EMAIL_MAX_CHARS: usize = 255;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid email regex"));

/// Persisted customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub version: u32,
    pub name: String,
    pub email: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Customer {
    /// Builds an unsaved record with a fresh identity from validated fields.
    pub fn new(draft: CustomerDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            version: 0,
            name: draft.name,
            email: draft.email,
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.version > 0
    }
}

/// Inbound customer payload shared by create, replace and patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerInput {
    pub id: Option<CustomerId>,
    pub version: Option<u32>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Business fields of a customer that passed structural validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDraft {
    pub name: String,
    /// Trimmed; blank inbound emails are normalized to `None`.
    pub email: Option<String>,
}

impl CustomerInput {
    pub fn validate(&self) -> Result<CustomerDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if is_blank(self.name.as_deref()) {
            errors.push("name", MSG_NOT_BLANK);
        }
        self.check_present_values(&mut errors);

        match &self.name {
            Some(name) if errors.is_empty() => Ok(CustomerDraft {
                name: name.clone(),
                email: non_blank(self.email.as_deref()).map(|email| email.trim().to_string()),
            }),
            _ => Err(errors),
        }
    }

    pub fn validate_patch(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.check_present_values(&mut errors);
        errors.into_result()
    }

    fn check_present_values(&self, errors: &mut ValidationErrors) {
        if let Some(name) = self.name.as_deref() {
            if name.chars().count() > CUSTOMER_NAME_MAX_CHARS {
                errors.push("name", max_length_message(CUSTOMER_NAME_MAX_CHARS));
            }
        }
        if let Some(email) = non_blank(self.email.as_deref()).map(str::trim) {
            if email.chars().count() > CUSTOMER_EMAIL_MAX_CHARS {
                errors.push("email", max_length_message(CUSTOMER_EMAIL_MAX_CHARS));
            } else if !EMAIL_RE.is_match(email) {
                errors.push("email", MSG_EMAIL);
            }
        }
    }
}
