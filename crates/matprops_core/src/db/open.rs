//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Create new store files, open existing ones, or open in-memory stores.
//! - Configure connection pragmas required by core behavior.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - `open_db` never creates a file; `create_db` never reuses one.

use super::schema::{ensure_schema_version, initialize_schema};
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Creates a new store file at `path` with the full schema.
///
/// # Errors
/// - `DbError::InvalidPath` when `path` is blank; SQLite would otherwise
///   fall back to a private temporary store.
/// - `DbError::AlreadyExists` when any file is present at `path`.
/// - `DbError::Sqlite` when the file cannot be created or initialized; a
///   partially initialized file is removed again.
///
/// # Side effects
/// - Emits `db_create` logging events with duration and status.
pub fn create_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=db_create module=db status=start mode=file");

    if path.as_os_str().to_string_lossy().trim().is_empty() {
        error!(
            "event=db_create module=db status=error mode=file duration_ms={} error_code=db_path_blank",
            started_at.elapsed().as_millis()
        );
        return Err(DbError::InvalidPath(path.to_path_buf()));
    }

    if path.exists() {
        error!(
            "event=db_create module=db status=error mode=file duration_ms={} error_code=db_exists",
            started_at.elapsed().as_millis()
        );
        return Err(DbError::AlreadyExists(path.to_path_buf()));
    }

    let result = Connection::open(path)
        .map_err(DbError::from)
        .and_then(|mut conn| {
            configure_connection(&conn)?;
            initialize_schema(&mut conn)?;
            Ok(conn)
        });

    match result {
        Ok(conn) => {
            info!(
                "event=db_create module=db status=ok mode=file duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            let _ = std::fs::remove_file(path);
            error!(
                "event=db_create module=db status=error mode=file duration_ms={} error_code=db_init_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens an existing store file read-write.
///
/// # Errors
/// - `DbError::NotFound` when nothing exists at `path`.
/// - `DbError::SchemaVersionMismatch` when the file was not created by this
///   schema version (including foreign SQLite files).
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    if !path.exists() {
        error!(
            "event=db_open module=db status=error mode=file duration_ms={} error_code=db_missing",
            started_at.elapsed().as_millis()
        );
        return Err(DbError::NotFound(path.to_path_buf()));
    }

    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let result = Connection::open_with_flags(path, flags)
        .map_err(DbError::from)
        .and_then(|conn| {
            configure_connection(&conn)?;
            ensure_schema_version(&conn)?;
            Ok(conn)
        });

    match result {
        Ok(conn) => {
            info!(
                "event=db_open module=db status=ok mode=file duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens a fresh in-memory store with the full schema.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let result = Connection::open_in_memory()
        .map_err(DbError::from)
        .and_then(|mut conn| {
            configure_connection(&conn)?;
            initialize_schema(&mut conn)?;
            Ok(conn)
        });

    match result {
        Ok(conn) => {
            info!(
                "event=db_open module=db status=ok mode=memory duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn configure_connection(conn: &Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}
