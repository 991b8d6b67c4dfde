//! Session-scoped record filters.
//!
//! # Responsibility
//! - Validate comparison operators and typed comparison values.
//! - Combine filters into one parameterized `WHERE` fragment.
//!
//! # Invariants
//! - A `Filter` only exists with a recognized operator.
//! - Filter values are bound as SQL parameters typed after their column.
//! - Filters are held in memory only and never persisted.

use super::column::Column;
use super::validation::ValidationError;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Comparison operator accepted by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
}

impl Operator {
    /// Recognized operator spellings, in prompt order.
    pub const SYMBOLS: [&'static str; 5] = ["<", "=", ">", ">=", "<="];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Le => "<=",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "<" => Ok(Self::Lt),
            "=" => Ok(Self::Eq),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            "<=" => Ok(Self::Le),
            other => Err(ValidationError::InvalidOperator {
                operator: other.to_string(),
                valid: &Self::SYMBOLS,
            }),
        }
    }
}

/// Comparison value typed after the filtered column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(f64),
    Text(String),
}

impl FilterValue {
    fn to_sql_value(&self) -> Value {
        match self {
            Self::Number(value) => Value::Real(*value),
            Self::Text(value) => Value::Text(value.clone()),
        }
    }
}

impl Display for FilterValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// One `column operator value` predicate over the joined view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub column: Column,
    pub operator: Operator,
    pub value: FilterValue,
}

impl Filter {
    /// Builds a filter from raw user input.
    ///
    /// The operator is validated first, then the value is parsed to the
    /// column's type. A blank value for a numeric column is rejected since
    /// comparing against `NULL` never matches.
    pub fn new(column: Column, value: &str, operator: &str) -> Result<Self, ValidationError> {
        let operator = operator.parse::<Operator>()?;
        let value = if column.is_numeric() {
            match column.parse_number(value)? {
                Some(number) => FilterValue::Number(number),
                None => {
                    return Err(ValidationError::InvalidNumber {
                        column: column.as_str(),
                        value: value.to_string(),
                    })
                }
            }
        } else {
            FilterValue::Text(value.to_string())
        };

        Ok(Self {
            column,
            operator,
            value,
        })
    }

    /// Parameterized clause and its bound value.
    ///
    /// The column name comes from the `Column` allow-list.
    pub fn to_sql(&self) -> (String, Value) {
        (
            format!("{} {} ?", self.column.as_str(), self.operator.as_str()),
            self.value.to_sql_value(),
        )
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} \"{}\"", self.column, self.operator, self.value)
    }
}

/// Ordered AND-combination of filters for one open session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends a filter built from raw input.
    pub fn add(&mut self, column: Column, value: &str, operator: &str) -> Result<(), ValidationError> {
        let filter = Filter::new(column, value, operator)?;
        self.filters.push(filter);
        Ok(())
    }

    /// Removes the first filter equal to `filter`.
    ///
    /// Returns `false` when no such filter is present.
    pub fn remove(&mut self, filter: &Filter) -> bool {
        match self.filters.iter().position(|existing| existing == filter) {
            Some(index) => {
                self.filters.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.filters.iter()
    }

    pub fn as_slice(&self) -> &[Filter] {
        &self.filters
    }

    /// Builds `AND`-joined clauses and bind values.
    ///
    /// Returns an empty clause list when the set is empty.
    pub fn to_sql(&self) -> (Vec<String>, Vec<Value>) {
        self.filters.iter().map(Filter::to_sql).unzip()
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}
