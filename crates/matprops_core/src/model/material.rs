//! Material domain model.
//!
//! # Responsibility
//! - Define the flat record read back from the joined `properties` view.
//! - Define the per-category aggregate read from `category_summaries`.
//!
//! # Invariants
//! - `material` is unique and non-empty.
//! - Every property is optional; `None` is stored as SQL `NULL`.

use super::column::Column;
use super::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// Category vocabulary seeded at store creation, in display order.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["Metal", "Polymer", "Ceramic", "Composite", "Other"];

/// The six measured mechanical properties of one material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MechanicalProperties {
    /// kg/m³
    pub density: Option<f64>,
    /// GPa
    pub modulus_of_elasticity: Option<f64>,
    /// GPa
    pub modulus_of_rigidity: Option<f64>,
    /// MPa
    pub yield_strength: Option<f64>,
    /// MPa
    pub ultimate_tensile_strength: Option<f64>,
    /// Percent.
    pub percent_elongation: Option<f64>,
}

impl MechanicalProperties {
    /// Parses raw text inputs in `Column::PROPERTIES` order.
    ///
    /// Blank inputs become `None`.
    pub fn parse(inputs: [&str; 6]) -> Result<Self, ValidationError> {
        let mut properties = Self::default();
        for (column, raw) in Column::PROPERTIES.into_iter().zip(inputs) {
            properties.set(column, column.parse_number(raw)?);
        }
        Ok(properties)
    }

    /// Returns the value for a numeric column, `None` for text columns.
    pub fn get(&self, column: Column) -> Option<f64> {
        match column {
            Column::Density => self.density,
            Column::ModulusOfElasticity => self.modulus_of_elasticity,
            Column::ModulusOfRigidity => self.modulus_of_rigidity,
            Column::YieldStrength => self.yield_strength,
            Column::UltimateTensileStrength => self.ultimate_tensile_strength,
            Column::PercentElongation => self.percent_elongation,
            Column::Material | Column::Category => None,
        }
    }

    /// Sets the value for a numeric column. Text columns are ignored.
    pub fn set(&mut self, column: Column, value: Option<f64>) {
        match column {
            Column::Density => self.density = value,
            Column::ModulusOfElasticity => self.modulus_of_elasticity = value,
            Column::ModulusOfRigidity => self.modulus_of_rigidity = value,
            Column::YieldStrength => self.yield_strength = value,
            Column::UltimateTensileStrength => self.ultimate_tensile_strength = value,
            Column::PercentElongation => self.percent_elongation = value,
            Column::Material | Column::Category => {}
        }
    }

    /// Values in `Column::PROPERTIES` order.
    pub fn values(&self) -> [Option<f64>; 6] {
        Column::PROPERTIES.map(|column| self.get(column))
    }
}

/// One row of the joined `properties` view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub material: String,
    pub category: String,
    #[serde(flatten)]
    pub properties: MechanicalProperties,
}

/// One row of the `category_summaries` view.
///
/// Averages ignore missing values. A category without any measured value for
/// a column (including a category with no materials) reports `None`, which
/// the view stores as an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    /// Number of materials in the category.
    pub materials: u32,
    #[serde(flatten)]
    pub averages: MechanicalProperties,
}

#[cfg(test)]
mod tests {
    use super::{MaterialRecord, MechanicalProperties};
    use crate::model::column::Column;
    use crate::model::validation::ValidationError;

    #[test]
    fn parse_maps_inputs_in_property_order() {
        let parsed = MechanicalProperties::parse(["7870", "200", "", "350", "420", "15"]).unwrap();
        assert_eq!(parsed.density, Some(7870.0));
        assert_eq!(parsed.modulus_of_elasticity, Some(200.0));
        assert_eq!(parsed.modulus_of_rigidity, None);
        assert_eq!(parsed.percent_elongation, Some(15.0));
        assert_eq!(
            parsed.values(),
            [Some(7870.0), Some(200.0), None, Some(350.0), Some(420.0), Some(15.0)]
        );
    }

    #[test]
    fn parse_reports_offending_column() {
        let err = MechanicalProperties::parse(["1", "2", "3", "strong", "5", "6"]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidNumber { column: "yield_strength", .. }
        ));
    }

    #[test]
    fn set_ignores_text_columns() {
        let mut properties = MechanicalProperties::default();
        properties.set(Column::Category, Some(1.0));
        assert_eq!(properties, MechanicalProperties::default());
        assert_eq!(properties.get(Column::Material), None);
    }

    #[test]
    fn record_serializes_as_flat_view_row() {
        let record = MaterialRecord {
            material: "PTFE".to_string(),
            category: "Polymer".to_string(),
            properties: MechanicalProperties {
                density: Some(2200.0),
                ..MechanicalProperties::default()
            },
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["material"], "PTFE");
        assert_eq!(json["category"], "Polymer");
        assert_eq!(json["density"], 2200.0);
        assert!(json["yield_strength"].is_null());
    }
}
