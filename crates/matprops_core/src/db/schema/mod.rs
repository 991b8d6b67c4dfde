//! Store schema definition and initialization.
//!
//! # Responsibility
//! - Create base tables and derived views on a fresh store.
//! - Seed the category vocabulary in display order.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Initialization runs in one transaction; a failure leaves no tables behind.
//! - Existing stores are never migrated; a version mismatch is an error.

use crate::db::{DbError, DbResult};
use crate::model::material::DEFAULT_CATEGORIES;
use rusqlite::{params, Connection};

/// Schema version stamped on every store created by this binary.
pub const SCHEMA_VERSION: u32 = 1;

const INIT_SQL: &str = include_str!("0001_init.sql");

/// Creates tables and views and seeds categories on an empty connection.
///
/// Fails with the underlying SQLite error when any schema object already
/// exists.
pub fn initialize_schema(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(INIT_SQL)?;
    {
        let mut stmt = tx.prepare("INSERT INTO material_categories (category) VALUES (?1);")?;
        for category in DEFAULT_CATEGORIES {
            stmt.execute(params![category])?;
        }
    }
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;
    Ok(())
}

/// Verifies that an existing store was created with the supported schema.
pub fn ensure_schema_version(conn: &Connection) -> DbResult<()> {
    let found = current_user_version(conn)?;
    if found != SCHEMA_VERSION {
        return Err(DbError::SchemaVersionMismatch {
            found,
            expected: SCHEMA_VERSION,
        });
    }
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
