//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and query calls into use-case level APIs.
//! - Keep the CLI decoupled from storage details.

pub mod editor_session;
