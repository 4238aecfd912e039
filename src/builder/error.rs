//! Builder error types

use std::fmt;

/// Errors raised by checked query building
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// A filter has an empty field name
    EmptyFieldName {
        /// "field" or "metadata"
        kind: &'static str,
        index: usize,
    },
    /// A field name, alias or metadata key is not a safe identifier
    InvalidIdentifier {
        identifier: String,
    },
    /// An aggregation is neither a known name nor a percentile in 0..=100
    UnknownAggregation {
        aggregation: String,
    },
    /// Nothing would be selected
    NoSelectColumns,
    /// No FROM source given
    NoSource,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::EmptyFieldName { kind, index } => {
                write!(f, "Empty field name in {} filter #{}", kind, index)
            }
            BuildError::InvalidIdentifier { identifier } => {
                write!(f, "Invalid identifier '{}'", identifier)
            }
            BuildError::UnknownAggregation { aggregation } => {
                write!(f, "Unknown aggregation '{}'", aggregation)
            }
            BuildError::NoSelectColumns => {
                write!(f, "Query selects no columns")
            }
            BuildError::NoSource => {
                write!(f, "Query has no FROM source")
            }
        }
    }
}

impl std::error::Error for BuildError {}
