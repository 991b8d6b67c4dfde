//! SQLite query engine over `properties` and `category_summaries`.
//!
//! # Responsibility
//! - List joined material rows, optionally sorted or filtered.
//! - Read per-category aggregates in category display order.
//!
//! # Invariants
//! - Sort columns come from the `Column` allow-list only.
//! - Filter values are always bound as parameters.
//! - Ordering is deterministic: ties fall back to `material ASC`.

use crate::db::DbError;
use crate::model::column::Column;
use crate::model::filter::FilterSet;
use crate::model::material::{CategorySummary, MaterialRecord, MechanicalProperties};
use crate::model::validation::ValidationError;
use crate::repo::material_repo::{parse_material_row, MATERIAL_SELECT_SQL};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for query APIs.
pub type QueryResult<T> = Result<T, QueryError>;

/// Query-layer error for DB interaction and result decoding.
#[derive(Debug)]
pub enum QueryError {
    Validation(ValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid query row: {message}"),
        }
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for QueryError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for QueryError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for QueryError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Sort options for full listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub order_by: Column,
    pub descending: bool,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            order_by: Column::Material,
            descending: false,
        }
    }
}

impl SortOrder {
    /// Builds a sort order from an untrusted column name.
    pub fn parse(order_by: &str, descending: bool) -> QueryResult<Self> {
        Ok(Self {
            order_by: order_by.parse()?,
            descending,
        })
    }

    fn to_sql(self) -> String {
        let direction = if self.descending { "DESC" } else { "ASC" };
        if self.order_by == Column::Material {
            format!("ORDER BY material {direction}")
        } else {
            format!(
                "ORDER BY {} {direction}, material ASC",
                self.order_by.as_str()
            )
        }
    }
}

/// Read-only query contract over the derived views.
pub trait MaterialQueries {
    fn list_all(&self, order: SortOrder) -> QueryResult<Vec<MaterialRecord>>;
    fn list_filtered(&self, filters: &FilterSet) -> QueryResult<Vec<MaterialRecord>>;
    fn category_summary(&self) -> QueryResult<Vec<CategorySummary>>;
    fn list_columns(&self) -> QueryResult<Vec<String>>;
    fn list_categories(&self) -> QueryResult<Vec<String>>;
}

/// SQLite-backed query engine.
pub struct SqliteMaterialQueries<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMaterialQueries<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn collect_materials(&self, sql: &str, bind_values: Vec<Value>) -> QueryResult<Vec<MaterialRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut materials = Vec::new();

        while let Some(row) = rows.next()? {
            materials.push(parse_material_row(row)?);
        }

        Ok(materials)
    }
}

impl MaterialQueries for SqliteMaterialQueries<'_> {
    /// Lists every joined row sorted by `order`.
    fn list_all(&self, order: SortOrder) -> QueryResult<Vec<MaterialRecord>> {
        let sql = format!("{MATERIAL_SELECT_SQL} {};", order.to_sql());
        let materials = self.collect_materials(&sql, Vec::new())?;
        debug!(
            "event=list_all module=query status=ok order_by={} descending={} rows={}",
            order.order_by,
            order.descending,
            materials.len()
        );
        Ok(materials)
    }

    /// Lists joined rows matching every filter.
    ///
    /// An empty filter set places no restriction and returns every row.
    fn list_filtered(&self, filters: &FilterSet) -> QueryResult<Vec<MaterialRecord>> {
        let (clauses, bind_values) = filters.to_sql();
        let mut sql = format!("{MATERIAL_SELECT_SQL} WHERE 1 = 1");
        for clause in &clauses {
            sql.push_str(" AND ");
            sql.push_str(clause);
        }
        sql.push_str(" ORDER BY material ASC;");

        let materials = self.collect_materials(&sql, bind_values)?;
        debug!(
            "event=list_filtered module=query status=ok filters={} rows={}",
            clauses.len(),
            materials.len()
        );
        Ok(materials)
    }

    /// Per-category count and averages in category display order.
    fn category_summary(&self) -> QueryResult<Vec<CategorySummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                category,
                materials,
                density,
                modulus_of_elasticity,
                modulus_of_rigidity,
                yield_strength,
                ultimate_tensile_strength,
                percent_elongation
             FROM category_summaries;",
        )?;
        let mut rows = stmt.query([])?;
        let mut summaries = Vec::new();

        while let Some(row) = rows.next()? {
            summaries.push(parse_summary_row(row)?);
        }

        Ok(summaries)
    }

    /// Column names of the joined view, in view order.
    fn list_columns(&self) -> QueryResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info('properties') ORDER BY cid ASC;")?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// Category names in display order.
    fn list_categories(&self) -> QueryResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT category
             FROM material_categories
             ORDER BY material_category_id ASC;",
        )?;
        let categories = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }
}

fn parse_summary_row(row: &Row<'_>) -> QueryResult<CategorySummary> {
    let category: String = row.get("category")?;
    let count: i64 = row.get("materials")?;
    let materials = u32::try_from(count).map_err(|_| {
        QueryError::InvalidData(format!(
            "invalid material count `{count}` for category `{category}`"
        ))
    })?;

    let mut averages = MechanicalProperties::default();
    for column in Column::PROPERTIES {
        let value: Value = row.get(column.as_str())?;
        averages.set(column, parse_average(column, value)?);
    }

    Ok(CategorySummary {
        category,
        materials,
        averages,
    })
}

/// Decodes an average stored by the view as either a number or `''`.
fn parse_average(column: Column, value: Value) -> QueryResult<Option<f64>> {
    match value {
        Value::Real(average) => Ok(Some(average)),
        Value::Integer(average) => Ok(Some(average as f64)),
        Value::Null => Ok(None),
        Value::Text(text) if text.is_empty() => Ok(None),
        other => Err(QueryError::InvalidData(format!(
            "invalid average `{other:?}` in category_summaries.{column}"
        ))),
    }
}
