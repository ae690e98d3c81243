//! Read-side projection applied after filtering and pagination.
//!
//! Only affects the returned copies; persisted rows are never touched.

use crate::model::beer::Beer;
use crate::query::page::Page;

/// Clears `quantity_on_hand` on every item when `show_inventory` is
/// explicitly `false`. A missing flag keeps full detail.
pub fn project_inventory(mut page: Page<Beer>, show_inventory: Option<bool>) -> Page<Beer> {
    if show_inventory == Some(false) {
        for beer in &mut page.items {
            beer.quantity_on_hand = None;
        }
    }
    page
}
