//! Identifier validation
//!
//! Field names, aliases and metadata keys are templated into SQL without
//! escaping, so the checked builder restricts them to a conservative grammar.
//! Aggregations must be known names or in-range percentiles.

use once_cell::sync::Lazy;
use regex::Regex;
use crate::query::{AggregationSpec, Filter, QueryProperties};
use super::error::BuildError;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("identifier pattern is valid")
});

/// Whether `s` may be templated into SQL as a field name, alias or metadata key
pub fn is_valid_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

/// Check every field name, alias, metadata key and aggregation in `properties`
pub fn validate_properties(properties: &QueryProperties) -> Result<(), BuildError> {
    validate_filters("field", &properties.field_filters)?;
    validate_filters("metadata", &properties.metadata_filters)?;
    validate_aggregations(&properties.aggregations)
}

fn validate_aggregations(aggregations: &[AggregationSpec]) -> Result<(), BuildError> {
    match aggregations.iter().find(|a| !a.is_known()) {
        Some(unknown) => Err(BuildError::UnknownAggregation {
            aggregation: unknown.to_string(),
        }),
        None => Ok(()),
    }
}

fn validate_filters(kind: &'static str, filters: &[Filter]) -> Result<(), BuildError> {
    for (index, filter) in filters.iter().enumerate() {
        if filter.field_name.is_empty() {
            return Err(BuildError::EmptyFieldName { kind, index });
        }
        check(&filter.field_name)?;
        if let Some(alias) = &filter.field_alias {
            check(alias)?;
        }
    }
    Ok(())
}

fn check(identifier: &str) -> Result<(), BuildError> {
    if is_valid_identifier(identifier) {
        Ok(())
    } else {
        Err(BuildError::InvalidIdentifier {
            identifier: identifier.to_string(),
        })
    }
}
