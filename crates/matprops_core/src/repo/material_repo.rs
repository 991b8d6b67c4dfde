//! Material repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/update/delete/lookup over `materials` and
//!   `mechanical_properties`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - A material and its properties row are inserted together or not at all.
//! - Updates touch exactly one column chosen from the `Column` allow-list.
//! - Deleting a material cascades to its properties row.

use crate::db::DbError;
use crate::model::column::Column;
use crate::model::material::{MaterialRecord, MechanicalProperties};
use crate::model::validation::{validate_name, ValidationError};
use log::{info, warn};
use rusqlite::ffi;
use rusqlite::types::Value;
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) const MATERIAL_SELECT_SQL: &str = "SELECT
    material,
    category,
    density,
    modulus_of_elasticity,
    modulus_of_rigidity,
    yield_strength,
    ultimate_tensile_strength,
    percent_elongation
FROM properties";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for material persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// Another material already uses this name.
    AlreadyExists(String),
    /// Category is not part of `material_categories`.
    UnknownCategory(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::AlreadyExists(name) => {
                write!(f, "a material named `{name}` already exists")
            }
            Self::UnknownCategory(category) => write!(f, "unknown material category `{category}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::AlreadyExists(_) | Self::UnknownCategory(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for material CRUD operations.
pub trait MaterialRepository {
    /// Inserts a material and its properties row.
    fn add_entry(
        &self,
        name: &str,
        category: &str,
        properties: &MechanicalProperties,
    ) -> RepoResult<()>;
    /// Updates one column of one material; returns whether a row changed.
    fn update_entry(&self, name: &str, column: Column, value: &str) -> RepoResult<bool>;
    /// Deletes a material; returns whether a row was removed.
    fn delete_material(&self, name: &str) -> RepoResult<bool>;
    /// Looks up one joined view row by material name.
    fn get_entry_by_material(&self, name: &str) -> RepoResult<Option<MaterialRecord>>;
}

/// SQLite-backed material repository.
pub struct SqliteMaterialRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMaterialRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MaterialRepository for SqliteMaterialRepository<'_> {
    fn add_entry(
        &self,
        name: &str,
        category: &str,
        properties: &MechanicalProperties,
    ) -> RepoResult<()> {
        let name = validate_name(name)?;

        // Dropping `tx` on an early return rolls both inserts back.
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO materials (material, category) VALUES (?1, ?2);",
            params![name, category],
        )
        .map_err(|err| constraint_error(err, name, category))?;
        tx.execute(
            "INSERT INTO mechanical_properties (
                material,
                density,
                modulus_of_elasticity,
                modulus_of_rigidity,
                yield_strength,
                ultimate_tensile_strength,
                percent_elongation
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                name,
                properties.density,
                properties.modulus_of_elasticity,
                properties.modulus_of_rigidity,
                properties.yield_strength,
                properties.ultimate_tensile_strength,
                properties.percent_elongation,
            ],
        )?;
        tx.commit()?;

        info!("event=material_add module=repo status=ok material={name}");
        Ok(())
    }

    fn update_entry(&self, name: &str, column: Column, value: &str) -> RepoResult<bool> {
        let (table, bound) = match column {
            Column::Material => (
                "materials",
                Value::Text(validate_name(value)?.to_string()),
            ),
            Column::Category => ("materials", Value::Text(value.to_string())),
            numeric => (
                "mechanical_properties",
                numeric
                    .parse_number(value)?
                    .map_or(Value::Null, Value::Real),
            ),
        };

        // `table` and `column` both come from fixed allow-lists.
        let sql = format!(
            "UPDATE {table}
             SET {column} = ?1
             WHERE material = ?2;",
            column = column.as_str()
        );
        let changed = self
            .conn
            .execute(&sql, params![bound, name])
            .map_err(|err| constraint_error(err, value, value))?;

        if changed == 1 {
            info!(
                "event=material_update module=repo status=ok material={name} column={column}"
            );
        } else {
            warn!(
                "event=material_update module=repo status=not_found material={name} column={column}"
            );
        }
        Ok(changed == 1)
    }

    fn delete_material(&self, name: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM materials WHERE material = ?1;", [name])?;

        if changed == 1 {
            info!("event=material_delete module=repo status=ok material={name}");
        } else {
            warn!("event=material_delete module=repo status=not_found material={name}");
        }
        Ok(changed == 1)
    }

    fn get_entry_by_material(&self, name: &str) -> RepoResult<Option<MaterialRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MATERIAL_SELECT_SQL}
             WHERE material = ?1;"
        ))?;

        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_material_row(row)?));
        }

        Ok(None)
    }
}

/// Decodes one row selected with `MATERIAL_SELECT_SQL`.
pub(crate) fn parse_material_row(row: &Row<'_>) -> rusqlite::Result<MaterialRecord> {
    Ok(MaterialRecord {
        material: row.get("material")?,
        category: row.get("category")?,
        properties: MechanicalProperties {
            density: row.get("density")?,
            modulus_of_elasticity: row.get("modulus_of_elasticity")?,
            modulus_of_rigidity: row.get("modulus_of_rigidity")?,
            yield_strength: row.get("yield_strength")?,
            ultimate_tensile_strength: row.get("ultimate_tensile_strength")?,
            percent_elongation: row.get("percent_elongation")?,
        },
    })
}

/// Maps SQLite constraint failures to semantic repository errors.
///
/// `name` is reported for uniqueness violations, `category` for foreign-key
/// violations.
fn constraint_error(err: rusqlite::Error, name: &str, category: &str) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        if failure.code == ErrorCode::ConstraintViolation {
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
                    return RepoError::AlreadyExists(name.to_string());
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return RepoError::UnknownCategory(category.to_string());
                }
                _ => {}
            }
        }
    }
    RepoError::from(err)
}
