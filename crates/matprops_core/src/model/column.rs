//! Column allow-list for the joined `properties` view.
//!
//! # Responsibility
//! - Enumerate every column a caller may update, sort or filter by.
//! - Map between column identifiers and their SQL names.
//!
//! # Invariants
//! - `Column::ALL` follows the column order of the `properties` view.
//! - Only `Column::as_str` output is ever spliced into SQL text.

use super::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One column of the joined `properties` view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Material,
    Category,
    /// kg/m³
    Density,
    /// GPa
    ModulusOfElasticity,
    /// GPa
    ModulusOfRigidity,
    /// MPa
    YieldStrength,
    /// MPa
    UltimateTensileStrength,
    /// Percent.
    PercentElongation,
}

impl Column {
    /// All view columns, in view order.
    pub const ALL: [Column; 8] = [
        Column::Material,
        Column::Category,
        Column::Density,
        Column::ModulusOfElasticity,
        Column::ModulusOfRigidity,
        Column::YieldStrength,
        Column::UltimateTensileStrength,
        Column::PercentElongation,
    ];

    /// Numeric property columns stored in `mechanical_properties`.
    pub const PROPERTIES: [Column; 6] = [
        Column::Density,
        Column::ModulusOfElasticity,
        Column::ModulusOfRigidity,
        Column::YieldStrength,
        Column::UltimateTensileStrength,
        Column::PercentElongation,
    ];

    /// SQL column name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Material => "material",
            Self::Category => "category",
            Self::Density => "density",
            Self::ModulusOfElasticity => "modulus_of_elasticity",
            Self::ModulusOfRigidity => "modulus_of_rigidity",
            Self::YieldStrength => "yield_strength",
            Self::UltimateTensileStrength => "ultimate_tensile_strength",
            Self::PercentElongation => "percent_elongation",
        }
    }

    /// Whether the column holds a measured number rather than text.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Material | Self::Category)
    }

    /// Parses raw user input for a numeric column.
    ///
    /// Empty (or whitespace-only) input means "no value" and yields `None`.
    pub fn parse_number(self, raw: &str) -> Result<Option<f64>, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidNumber {
                column: self.as_str(),
                value: raw.to_string(),
            })
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|column| column.as_str() == trimmed)
            .ok_or_else(|| ValidationError::UnknownColumn(value.to_string()))
    }
}
