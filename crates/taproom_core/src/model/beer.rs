//! Beer catalog entry model.
//!
//! # Responsibility
//! - Define the persisted catalog record and its inbound payload shape.
//! - Provide the structural validator run before create/replace.
//!
//! # Invariants
//! - `id`, `version`, `created_at` and `updated_at` are server-managed; the
//!   inbound payload may carry them but they are never copied from it.
//! - `version == 0` marks a record that has never been persisted.
//! - `name` is non-blank and at most `BEER_NAME_MAX_CHARS` characters.

use crate::model::money::Price;
use crate::model::validation::{
    is_blank, max_length_message, ValidationErrors, MSG_NOT_BLANK, MSG_NOT_NEGATIVE, MSG_NOT_NULL,
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

pub type BeerId = Uuid;

pub const BEER_NAME_MAX_CHARS: usize = 50;

/// Closed set of style tags a beer can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BeerStyle {
    Lager,
    Pilsner,
    Stout,
    Gose,
    Porter,
    Ale,
    Wheat,
    Ipa,
    PaleAle,
    Saison,
}

impl BeerStyle {
    pub const ALL: [BeerStyle; 10] = [
        BeerStyle::Lager,
        BeerStyle::Pilsner,
        BeerStyle::Stout,
        BeerStyle::Gose,
        BeerStyle::Porter,
        BeerStyle::Ale,
        BeerStyle::Wheat,
        BeerStyle::Ipa,
        BeerStyle::PaleAle,
        BeerStyle::Saison,
    ];

    /// Stable text form used in storage and query parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lager => "LAGER",
            Self::Pilsner => "PILSNER",
            Self::Stout => "STOUT",
            Self::Gose => "GOSE",
            Self::Porter => "PORTER",
            Self::Ale => "ALE",
            Self::Wheat => "WHEAT",
            Self::Ipa => "IPA",
            Self::PaleAle => "PALE_ALE",
            Self::Saison => "SAISON",
        }
    }
}

impl Display for BeerStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBeerStyle(pub String);

impl Display for UnknownBeerStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown beer style `{}`", self.0)
    }
}

impl Error for UnknownBeerStyle {}

impl FromStr for BeerStyle {
    type Err = UnknownBeerStyle;

    /// Accepts the stored form in any letter case (`PALE_ALE`, `pale_ale`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownBeerStyle(value.to_string()))
    }
}

/// Persisted catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beer {
    pub id: BeerId,
    /// Optimistic-concurrency token; 0 until first insert.
    pub version: u32,
    pub name: String,
    pub style: BeerStyle,
    pub upc: String,
    /// Hidden (set to `None`) by the inventory projection.
    pub quantity_on_hand: Option<i32>,
    pub price: Price,
    /// Epoch milliseconds, fixed at first insert.
    pub created_at: i64,
    /// Epoch milliseconds, refreshed on every successful write.
    pub updated_at: i64,
}

impl Beer {
    /// Builds an unsaved record with a fresh identity from validated fields.
    pub fn new(draft: BeerDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            version: 0,
            name: draft.name,
            style: draft.style,
            upc: draft.upc,
            quantity_on_hand: draft.quantity_on_hand,
            price: draft.price,
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.version > 0
    }
}

/// Inbound catalog payload.
///
/// Every field is optional so that the same shape serves create, full
/// replace and sparse patch requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeerInput {
    pub id: Option<BeerId>,
    pub version: Option<u32>,
    pub name: Option<String>,
    pub style: Option<BeerStyle>,
    pub upc: Option<String>,
    pub quantity_on_hand: Option<i32>,
    pub price: Option<Price>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Business fields of a beer that passed structural validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeerDraft {
    pub name: String,
    pub style: BeerStyle,
    pub upc: String,
    pub quantity_on_hand: Option<i32>,
    pub price: Price,
}

impl BeerInput {
    /// Validates a complete payload used by create and replace.
    ///
    /// # Errors
    /// - Returns every violated field at once.
    pub fn validate(&self) -> Result<BeerDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if is_blank(self.name.as_deref()) {
            errors.push("name", MSG_NOT_BLANK);
        }
        if self.style.is_none() {
            errors.push("style", MSG_NOT_NULL);
        }
        if is_blank(self.upc.as_deref()) {
            errors.push("upc", MSG_NOT_BLANK);
        }
        if self.price.is_none() {
            errors.push("price", MSG_NOT_NULL);
        }
        self.check_present_values(&mut errors);

        match (&self.name, self.style, &self.upc, self.price) {
            (Some(name), Some(style), Some(upc), Some(price)) if errors.is_empty() => {
                Ok(BeerDraft {
                    name: name.clone(),
                    style,
                    upc: upc.clone(),
                    quantity_on_hand: self.quantity_on_hand,
                    price,
                })
            }
            _ => Err(errors),
        }
    }

    /// Validates only the values a sparse patch actually carries.
    ///
    /// Blank strings are not violations here; the merge skips them.
    pub fn validate_patch(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.check_present_values(&mut errors);
        errors.into_result()
    }

    fn check_present_values(&self, errors: &mut ValidationErrors) {
        if let Some(name) = self.name.as_deref() {
            if name.chars().count() > BEER_NAME_MAX_CHARS {
                errors.push("name", max_length_message(BEER_NAME_MAX_CHARS));
            }
        }
        if self.quantity_on_hand.is_some_and(|qty| qty < 0) {
            errors.push("quantity_on_hand", MSG_NOT_NEGATIVE);
        }
        if self.price.is_some_and(Price::is_negative) {
            errors.push("price", MSG_NOT_NEGATIVE);
        }
    }
}
