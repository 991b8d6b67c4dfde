//! Domain model for materials, categories and session filters.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the fixed column allow-list shared by writes, sorts and filters.
//!
//! # Invariants
//! - Every material is identified by its unique, non-empty name.
//! - Column identifiers only ever reach SQL through [`column::Column`].

pub mod column;
pub mod filter;
pub mod material;
pub mod validation;
