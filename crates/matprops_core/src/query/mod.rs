//! Read-side queries over the derived views.
//!
//! # Responsibility
//! - Serve listing, sorting, filtering and aggregate reads.
//! - Expose view metadata used to drive column selection.

pub mod engine;
