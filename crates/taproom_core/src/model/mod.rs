//! Domain model for the catalog and customer resources.
//!
//! # Responsibility
//! - Define persisted records and their inbound payload shapes.
//! - Host the structural validators run before mutations.
//!
//! # Invariants
//! - Every record is identified by a stable UUID assigned on creation.
//! - Server-managed fields are never taken from inbound payloads.

pub mod beer;
pub mod customer;
pub mod money;
pub mod validation;
