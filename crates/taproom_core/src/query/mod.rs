//! List query engine shared by both resources.
//!
//! # Responsibility
//! - Normalize paging input (`page`).
//! - Select the store-level query from optional filters (`filter`).
//! - Apply read-side projections to result pages (`projection`).
//!
//! # Invariants
//! - Nothing in this module performs I/O.

pub mod filter;
pub mod page;
pub mod projection;
