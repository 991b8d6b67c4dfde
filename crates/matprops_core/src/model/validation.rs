//! Input validation errors shared by model constructors.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure raised before any SQL is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Material names must contain at least one non-whitespace character.
    EmptyName,
    /// Operator is not one of the recognized comparison operators.
    InvalidOperator {
        operator: String,
        valid: &'static [&'static str],
    },
    /// Column name is not part of the joined `properties` view.
    UnknownColumn(String),
    /// Numeric column received text that does not parse as a number.
    InvalidNumber { column: &'static str, value: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "material name cannot be blank"),
            Self::InvalidOperator { operator, valid } => write!(
                f,
                "Invalid Operator ({operator}): Must be [{}]",
                valid.join(", ")
            ),
            Self::UnknownColumn(name) => write!(f, "unknown column `{name}`"),
            Self::InvalidNumber { column, value } => {
                write!(f, "invalid numeric value `{value}` for column `{column}`")
            }
        }
    }
}

impl Error for ValidationError {}

/// Validates and normalizes a material name.
///
/// Surrounding whitespace is kept as entered; only blank names are rejected.
pub fn validate_name(name: &str) -> Result<&str, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::{validate_name, ValidationError};

    #[test]
    fn validate_name_rejects_blank_input() {
        assert_eq!(validate_name("   "), Err(ValidationError::EmptyName));
        assert_eq!(validate_name(""), Err(ValidationError::EmptyName));
        assert_eq!(validate_name("Steel-1020"), Ok("Steel-1020"));
    }

    #[test]
    fn invalid_operator_message_lists_valid_set() {
        let err = ValidationError::InvalidOperator {
            operator: "!=".to_string(),
            valid: &["<", "="],
        };
        assert_eq!(err.to_string(), "Invalid Operator (!=): Must be [<, =]");
    }
}
