//! Migration driver
//!
//! Runs an explicit, ascending list of schema versions over a document:
//! for each version, verify; if not satisfied, update and verify again.
//! The version is detected structurally, not from the stored `version` field.

use serde_json::Value;
use tracing::{debug, info, warn};
use crate::dashboard::{Dashboard, SchemaVersionId};
use super::catalogue;
use super::error::MigrationError;
use super::version::{SchemaVersion, Verification};

/// What a migration run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// `version` field as stored before the run
    pub stored: Option<SchemaVersionId>,
    /// Highest version the document structurally satisfied before the run
    pub detected: Option<SchemaVersionId>,
    /// Latest registered version; the document now satisfies it
    pub current: SchemaVersionId,
    /// Versions whose update was applied, in order
    pub applied: Vec<SchemaVersionId>,
}

impl MigrationReport {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty() || self.stored.map_or(true, |v| v < self.current)
    }
}

/// Ordered schema catalogue and the driver that applies it
#[derive(Debug, Clone)]
pub struct Migrator {
    versions: Vec<SchemaVersion>,
}

impl Migrator {
    /// Build from versions in ascending id order
    pub fn new(versions: Vec<SchemaVersion>) -> Result<Self, MigrationError> {
        if versions.is_empty() {
            return Err(MigrationError::EmptyCatalogue);
        }
        for pair in versions.windows(2) {
            if pair[1].id <= pair[0].id {
                return Err(MigrationError::OutOfOrder {
                    previous: pair[0].id,
                    next: pair[1].id,
                });
            }
        }
        Ok(Self { versions })
    }

    /// Migrator over `catalogue::all()`
    pub fn with_builtin_versions() -> Self {
        Self {
            versions: catalogue::all(),
        }
    }

    pub fn versions(&self) -> &[SchemaVersion] {
        &self.versions
    }

    pub fn latest(&self) -> SchemaVersionId {
        // new() guarantees at least one version
        self.versions.last().map(|v| v.id).unwrap_or(SchemaVersionId(0))
    }

    /// Highest version that, together with all earlier versions, verifies.
    ///
    /// `None` means the document does not satisfy even the first version.
    pub fn detect_version(&self, dashboard: &Dashboard) -> Result<Option<SchemaVersionId>, MigrationError> {
        let mut detected = None;
        for version in &self.versions {
            if !version.verify(dashboard)?.is_satisfied() {
                break;
            }
            detected = Some(version.id);
        }
        Ok(detected)
    }

    /// First unsatisfied invariant across all versions, in order
    pub fn verify(&self, dashboard: &Dashboard) -> Result<Verification, MigrationError> {
        for version in &self.versions {
            let result = version.verify(dashboard)?;
            if !result.is_satisfied() {
                return Ok(result);
            }
        }
        Ok(Verification::Satisfied)
    }

    pub fn is_current(&self, dashboard: &Dashboard) -> Result<bool, MigrationError> {
        Ok(self.verify(dashboard)?.is_satisfied())
    }

    /// Bring `dashboard` up to the latest version in place.
    ///
    /// Every update is followed by a second verify of the same version. On
    /// success `version` is set to the latest id unless it already holds a
    /// newer one. Running this on a current document changes nothing.
    pub fn migrate(&self, dashboard: &mut Dashboard) -> Result<MigrationReport, MigrationError> {
        let stored = dashboard.version;
        let detected = self.detect_version(dashboard)?;
        let mut applied = Vec::new();

        for version in &self.versions {
            let field = match version.verify(dashboard)? {
                Verification::Satisfied => {
                    debug!(version = %version.id, description = version.description, "schema version already satisfied");
                    continue;
                }
                Verification::MissingField(field) => field,
            };

            debug!(version = %version.id, description = version.description, %field, "applying schema update");
            version.update(dashboard)?;

            if let Verification::MissingField(field) = version.verify(dashboard)? {
                warn!(version = %version.id, %field, "schema update did not satisfy its own verification");
                return Err(MigrationError::UpdateIncomplete {
                    version: version.id,
                    field,
                });
            }
            applied.push(version.id);
        }

        let current = self.latest();
        match stored {
            Some(v) if v > current => {
                warn!(stored = %v, latest = %current, "dashboard carries a newer schema version than known");
            }
            Some(v) if v == current => {}
            _ => dashboard.version = Some(current),
        }

        let report = MigrationReport {
            stored,
            detected,
            current,
            applied,
        };
        if report.changed() {
            info!(
                id = dashboard.id.as_deref().unwrap_or(""),
                from = ?report.detected.map(|v| v.0),
                to = %report.current,
                applied = report.applied.len(),
                "dashboard migrated"
            );
        }
        Ok(report)
    }

    /// Deserialize, migrate and re-serialize a raw JSON document
    pub fn migrate_value(&self, value: Value) -> Result<(Value, MigrationReport), MigrationError> {
        let mut dashboard = Dashboard::from_value(value)?;
        let report = self.migrate(&mut dashboard)?;
        Ok((dashboard.to_value()?, report))
    }
}

impl Default for Migrator {
    fn default() -> Self {
        Self::with_builtin_versions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn has_title(d: &Dashboard) -> Result<Verification, MigrationError> {
        Ok(Verification::require(d.title.is_some(), "title"))
    }

    fn add_title(d: &mut Dashboard) -> Result<(), MigrationError> {
        d.title.get_or_insert_with(|| "Untitled".to_string());
        Ok(())
    }

    fn has_params(d: &Dashboard) -> Result<Verification, MigrationError> {
        Ok(Verification::require(d.params.is_some(), "params"))
    }

    fn forgets_params(_: &mut Dashboard) -> Result<(), MigrationError> {
        Ok(())
    }

    #[test]
    fn test_new_rejects_empty_and_unordered() {
        assert!(matches!(Migrator::new(Vec::new()), Err(MigrationError::EmptyCatalogue)));

        let unordered = vec![
            SchemaVersion::new(2, "title", has_title, add_title),
            SchemaVersion::new(2, "again", has_title, add_title),
        ];
        assert!(matches!(
            Migrator::new(unordered),
            Err(MigrationError::OutOfOrder { previous: SchemaVersionId(2), next: SchemaVersionId(2) })
        ));
    }

    #[test]
    fn test_update_that_does_not_satisfy_verify_is_reported() {
        let migrator = Migrator::new(vec![
            SchemaVersion::new(1, "title", has_title, add_title),
            SchemaVersion::new(2, "params", has_params, forgets_params),
        ])
        .unwrap();
        let mut dashboard = Dashboard::from_value(json!({"children": []})).unwrap();

        let err = migrator.migrate(&mut dashboard).unwrap_err();
        assert!(matches!(
            err,
            MigrationError::UpdateIncomplete { version: SchemaVersionId(2), ref field } if field == "params"
        ));
        // Version 1 already ran
        assert_eq!(dashboard.title.as_deref(), Some("Untitled"));
    }

    #[test]
    fn test_detect_version_stops_at_first_gap() {
        let migrator = Migrator::new(vec![
            SchemaVersion::new(1, "title", has_title, add_title),
            SchemaVersion::new(2, "params", has_params, forgets_params),
        ])
        .unwrap();

        // Satisfies version 2 but not version 1
        let dashboard = Dashboard::from_value(json!({"params": []})).unwrap();
        assert_eq!(migrator.detect_version(&dashboard).unwrap(), None);

        let dashboard = Dashboard::from_value(json!({"title": "t"})).unwrap();
        assert_eq!(migrator.detect_version(&dashboard).unwrap(), Some(SchemaVersionId(1)));
    }

    #[test]
    fn test_newer_stored_version_is_not_downgraded() {
        let migrator = Migrator::new(vec![SchemaVersion::new(1, "title", has_title, add_title)]).unwrap();
        let mut dashboard = Dashboard::from_value(json!({"title": "t", "version": "7"})).unwrap();
        let report = migrator.migrate(&mut dashboard).unwrap();
        assert_eq!(dashboard.version, Some(SchemaVersionId(7)));
        assert!(!report.changed());
    }

    #[test]
    fn test_builtin_latest() {
        assert_eq!(Migrator::default().latest(), SchemaVersionId(12));
    }
}
