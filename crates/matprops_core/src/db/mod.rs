//! SQLite store bootstrap and schema entry points.
//!
//! # Responsibility
//! - Create new stores and open existing ones as distinct operations.
//! - Configure connections for referential integrity.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write application data before the schema check succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod open;
pub mod schema;

pub use open::{create_db, open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// `create` target is blank.
    InvalidPath(PathBuf),
    /// `create` target is already occupied by a file.
    AlreadyExists(PathBuf),
    /// `open` target does not exist.
    NotFound(PathBuf),
    SchemaVersionMismatch {
        found: u32,
        expected: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidPath(path) => {
                write!(f, "`{}` is not a valid database path", path.display())
            }
            Self::AlreadyExists(path) => write!(f, "{} already exists", path.display()),
            Self::NotFound(path) => write!(f, "{} does not currently exist", path.display()),
            Self::SchemaVersionMismatch { found, expected } => write!(
                f,
                "database schema version {found} does not match supported version {expected}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::InvalidPath(_)
            | Self::AlreadyExists(_)
            | Self::NotFound(_)
            | Self::SchemaVersionMismatch { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
