//! Schema migration module
//!
//! Brings persisted dashboard documents up to the latest schema version:
//! - Versions: ordered verify/update pairs, one additive change each
//! - Walk: container and widget traversal shared by every version
//! - Migrator: runs the catalogue in ascending order and re-checks each update

mod error;
mod version;
mod walk;
mod migrator;
pub mod catalogue;

pub use error::MigrationError;
pub use version::{SchemaVersion, Verification, VerifyFn, UpdateFn};
pub use walk::{
    verify_dashboard,
    verify_containers,
    verify_widgets,
    update_containers,
    update_widgets,
    update_each_widget,
};
pub use migrator::{Migrator, MigrationReport};
