//! Core domain logic for the mechanical properties database editor.
//! This crate is the single source of truth for data invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::column::Column;
pub use model::filter::{Filter, FilterSet, FilterValue, Operator};
pub use model::material::{CategorySummary, MaterialRecord, MechanicalProperties, DEFAULT_CATEGORIES};
pub use model::validation::ValidationError;
pub use query::engine::{MaterialQueries, QueryError, QueryResult, SortOrder, SqliteMaterialQueries};
pub use repo::material_repo::{MaterialRepository, RepoError, RepoResult, SqliteMaterialRepository};
pub use service::editor_session::{create_database, EditorSession};
