//! Partial-update merge and full-update replace rules.
//!
//! # Invariants
//! - Neither operation touches `id`, `version`, `created_at` or `updated_at`;
//!   those belong to the persistence provider.
//! - Patch copies a field only when the payload carries it and, for text,
//!   only when the text is not blank.
//! - Replace copies every business field; an omitted optional field clears
//!   the stored value.

use crate::model::beer::{Beer, BeerDraft, BeerInput};
use crate::model::customer::{Customer, CustomerDraft, CustomerInput};
use crate::model::validation::non_blank;

pub fn patch_beer(existing: &mut Beer, incoming: &BeerInput) {
    if let Some(name) = non_blank(incoming.name.as_deref()) {
        existing.name = name.to_string();
    }
    if let Some(style) = incoming.style {
        existing.style = style;
    }
    if let Some(price) = incoming.price {
        existing.price = price;
    }
    if let Some(quantity) = incoming.quantity_on_hand {
        existing.quantity_on_hand = Some(quantity);
    }
    if let Some(upc) = non_blank(incoming.upc.as_deref()) {
        existing.upc = upc.to_string();
    }
}

pub fn replace_beer(existing: &mut Beer, incoming: BeerDraft) {
    existing.name = incoming.name;
    existing.style = incoming.style;
    existing.price = incoming.price;
    existing.upc = incoming.upc;
    existing.quantity_on_hand = incoming.quantity_on_hand;
}

pub fn patch_customer(existing: &mut Customer, incoming: &CustomerInput) {
    if let Some(name) = non_blank(incoming.name.as_deref()) {
        existing.name = name.to_string();
    }
    if let Some(email) = non_blank(incoming.email.as_deref()) {
        existing.email = Some(email.trim().to_string());
    }
}

pub fn replace_customer(existing: &mut Customer, incoming: CustomerDraft) {
    existing.name = incoming.name;
    existing.email = incoming.email;
}
