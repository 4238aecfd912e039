//! Migration error types

use std::fmt;
use crate::dashboard::SchemaVersionId;

/// Errors that can occur while verifying or migrating a dashboard
#[derive(Debug)]
pub enum MigrationError {
    /// The document cannot be walked: a required structural node is absent
    Malformed {
        path: String,
    },
    /// An update ran but its own verification still fails
    UpdateIncomplete {
        version: SchemaVersionId,
        field: String,
    },
    /// Migrator built with no versions
    EmptyCatalogue,
    /// Version ids are not strictly ascending
    OutOfOrder {
        previous: SchemaVersionId,
        next: SchemaVersionId,
    },
    /// Raw document could not be converted to or from JSON
    Json {
        source: serde_json::Error,
    },
}

impl fmt::Display for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationError::Malformed { path } => {
                write!(f, "Malformed dashboard: missing '{}'", path)
            }
            MigrationError::UpdateIncomplete { version, field } => {
                write!(f, "Update to schema version {} left '{}' unsatisfied", version, field)
            }
            MigrationError::EmptyCatalogue => {
                write!(f, "No schema versions registered")
            }
            MigrationError::OutOfOrder { previous, next } => {
                write!(f, "Schema version {} registered after {}; versions must be strictly ascending", next, previous)
            }
            MigrationError::Json { source } => {
                write!(f, "Invalid dashboard JSON: {}", source)
            }
        }
    }
}

impl std::error::Error for MigrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MigrationError::Json { source } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MigrationError {
    fn from(err: serde_json::Error) -> Self {
        MigrationError::Json { source: err }
    }
}
