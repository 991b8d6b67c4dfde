//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes validate input before any SQL mutation.
//! - Constraint violations surface as semantic errors (`AlreadyExists`,
//!   `UnknownCategory`) rather than raw SQLite failures.
//! - Missing rows are reported through `bool`/`Option` results, not errors.

pub mod material_repo;
