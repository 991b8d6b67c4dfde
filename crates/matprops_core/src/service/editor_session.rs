//! Editor session over one open store.
//!
//! # Responsibility
//! - Own the connection for the lifetime of one open store.
//! - Hold the session's filter set and apply it to filtered listings.
//! - Provide the entry points used by interactive callers.
//!
//! # Invariants
//! - Filters live only as long as the session and are never persisted.
//! - Every mutating call commits before returning.

use crate::db::{create_db, open_db, open_db_in_memory, DbError, DbResult};
use crate::model::column::Column;
use crate::model::filter::{Filter, FilterSet};
use crate::model::material::{CategorySummary, MaterialRecord, MechanicalProperties};
use crate::model::validation::ValidationError;
use crate::query::engine::{MaterialQueries, QueryResult, SortOrder, SqliteMaterialQueries};
use crate::repo::material_repo::{MaterialRepository, RepoResult, SqliteMaterialRepository};
use log::info;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Creates a new, empty store at `path` and closes it again.
pub fn create_database(path: impl AsRef<Path>) -> DbResult<()> {
    let conn = create_db(path)?;
    conn.close().map_err(|(_, err)| DbError::from(err))
}

/// An open store plus the filters collected while it is open.
pub struct EditorSession {
    path: Option<PathBuf>,
    conn: Connection,
    filters: FilterSet,
}

impl EditorSession {
    /// Opens an existing store. Fails with `DbError::NotFound` if missing.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        let conn = open_db(path)?;
        info!("event=session_open module=service status=ok mode=file");
        Ok(Self {
            path: Some(path.to_path_buf()),
            conn,
            filters: FilterSet::new(),
        })
    }

    /// Opens a fresh in-memory store.
    pub fn in_memory() -> DbResult<Self> {
        Ok(Self {
            path: None,
            conn: open_db_in_memory()?,
            filters: FilterSet::new(),
        })
    }

    /// Backing file, `None` for in-memory sessions.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn repo(&self) -> SqliteMaterialRepository<'_> {
        SqliteMaterialRepository::new(&self.conn)
    }

    pub fn queries(&self) -> SqliteMaterialQueries<'_> {
        SqliteMaterialQueries::new(&self.conn)
    }

    pub fn add_entry(
        &self,
        name: &str,
        category: &str,
        properties: &MechanicalProperties,
    ) -> RepoResult<()> {
        self.repo().add_entry(name, category, properties)
    }

    pub fn update_entry(&self, name: &str, column: Column, value: &str) -> RepoResult<bool> {
        self.repo().update_entry(name, column, value)
    }

    /// Updates one column and reads the record back under its current key.
    ///
    /// Returns `None` when no material named `name` exists.
    pub fn update_and_fetch(
        &self,
        name: &str,
        column: Column,
        value: &str,
    ) -> RepoResult<Option<MaterialRecord>> {
        if !self.update_entry(name, column, value)? {
            return Ok(None);
        }
        let key = if column == Column::Material { value } else { name };
        self.get_entry_by_material(key)
    }

    pub fn delete_material(&self, name: &str) -> RepoResult<bool> {
        self.repo().delete_material(name)
    }

    pub fn get_entry_by_material(&self, name: &str) -> RepoResult<Option<MaterialRecord>> {
        self.repo().get_entry_by_material(name)
    }

    pub fn list_all(&self, order: SortOrder) -> QueryResult<Vec<MaterialRecord>> {
        self.queries().list_all(order)
    }

    /// Lists rows matching the session filters.
    pub fn list_filtered(&self) -> QueryResult<Vec<MaterialRecord>> {
        self.queries().list_filtered(&self.filters)
    }

    pub fn category_summary(&self) -> QueryResult<Vec<CategorySummary>> {
        self.queries().category_summary()
    }

    pub fn list_columns(&self) -> QueryResult<Vec<String>> {
        self.queries().list_columns()
    }

    pub fn list_categories(&self) -> QueryResult<Vec<String>> {
        self.queries().list_categories()
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn add_filter(
        &mut self,
        column: Column,
        value: &str,
        operator: &str,
    ) -> Result<(), ValidationError> {
        self.filters.add(column, value, operator)
    }

    pub fn remove_filter(&mut self, filter: &Filter) -> bool {
        self.filters.remove(filter)
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Closes the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> DbResult<()> {
        self.conn.close().map_err(|(_, err)| DbError::from(err))?;
        info!("event=session_close module=service status=ok");
        Ok(())
    }
}
