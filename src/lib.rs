//! dashquery - Dashboard query compilation and document schema migration
//!
//! This library provides:
//! - Query properties types (QueryProperties, Filter, FilterClause, AggregationSpec)
//! - SQL text generation from query properties
//! - Typed dashboard documents with raw JSON passthrough
//! - Ordered schema-version migration of dashboard documents
//! - Loading query properties from YAML and dashboards from JSON
//!
//! # Architecture
//!
//! **Noun modules** (data structures):
//! - `query/` - declarative query description (QueryProperties, Filter, Aggregation)
//! - `dashboard/` - dashboard document tree (Dashboard, ContainerWidget, Widget)
//!
//! **Verb modules** (transformations):
//! - `parser/` - YAML/JSON → QueryProperties / Dashboard
//! - `builder/` - QueryProperties → SQL text
//! - `migration/` - Dashboard → Dashboard at the latest schema version
//!
//! # Example
//!
//! ```ignore
//! use dashquery::{build_query, Migrator, QueryTarget, parser};
//!
//! let mut dashboard = parser::parse_dashboard_file("dashboard.json")?;
//! let migrator = Migrator::with_builtin_versions();
//! migrator.migrate(&mut dashboard)?;
//!
//! for widget in dashboard.widgets() {
//!     let properties = widget.query_properties();
//!     let sql = build_query(&properties, &QueryTarget::from_table("samples.results"));
//! }
//! ```

pub mod query;
pub mod dashboard;
pub mod builder;
pub mod migration;
pub mod parser;
pub mod error;

// Re-export commonly used types
pub use query::{QueryProperties, Filter, FilterClause, DisplayMode, MatchRule, MatchOperand, Aggregation, AggregationSpec};
pub use dashboard::{Dashboard, ContainerWidget, ContainerConfig, Widget, Datasource, DatasourceConfig, SchemaVersionId};
pub use builder::{
    get_regexp_for_metadata, build_select_args, build_where_args, build_group_args,
    format_query, build_query, build_query_checked, QueryTarget, BuildError,
};
pub use migration::{Migrator, MigrationReport, MigrationError, SchemaVersion, Verification};
pub use error::ParseError;
