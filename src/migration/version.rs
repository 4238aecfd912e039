//! Schema version definitions

use std::fmt;
use crate::dashboard::{Dashboard, SchemaVersionId};
use super::error::MigrationError;

/// Outcome of checking one version's invariants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Satisfied,
    /// Path of the first field that does not satisfy the version
    MissingField(String),
}

impl Verification {
    /// `Satisfied` when `condition` holds, otherwise `MissingField(field)`
    pub fn require(condition: bool, field: &str) -> Self {
        if condition {
            Verification::Satisfied
        } else {
            Verification::MissingField(field.to_string())
        }
    }

    pub fn is_satisfied(&self) -> bool {
        matches!(self, Verification::Satisfied)
    }

    /// Evaluate `next` only if this is satisfied
    pub fn and_then(self, next: impl FnOnce() -> Verification) -> Verification {
        match self {
            Verification::Satisfied => next(),
            missing => missing,
        }
    }

    /// Prefix the missing field path with `prefix`
    pub fn within(self, prefix: &str) -> Verification {
        match self {
            Verification::MissingField(field) => Verification::MissingField(format!("{}.{}", prefix, field)),
            satisfied => satisfied,
        }
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verification::Satisfied => write!(f, "satisfied"),
            Verification::MissingField(field) => write!(f, "missing '{}'", field),
        }
    }
}

/// Checks whether a dashboard already satisfies a version.
///
/// `Err` means the document could not be walked at all.
pub type VerifyFn = fn(&Dashboard) -> Result<Verification, MigrationError>;

/// Mutates a dashboard in place to satisfy a version
pub type UpdateFn = fn(&mut Dashboard) -> Result<(), MigrationError>;

/// One step in the ordered evolution of the dashboard schema.
///
/// Updates only add or normalize fields and leave satisfied fields alone,
/// so applying one to a document that is already current changes nothing.
#[derive(Clone, Copy)]
pub struct SchemaVersion {
    pub id: SchemaVersionId,
    pub description: &'static str,
    verify: VerifyFn,
    update: UpdateFn,
}

impl SchemaVersion {
    pub const fn new(id: u32, description: &'static str, verify: VerifyFn, update: UpdateFn) -> Self {
        Self {
            id: SchemaVersionId(id),
            description,
            verify,
            update,
        }
    }

    pub fn verify(&self, dashboard: &Dashboard) -> Result<Verification, MigrationError> {
        (self.verify)(dashboard)
    }

    pub fn update(&self, dashboard: &mut Dashboard) -> Result<(), MigrationError> {
        (self.update)(dashboard)
    }
}

impl fmt::Debug for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaVersion")
            .field("id", &self.id)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
