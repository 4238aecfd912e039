//! Dashboard document types (nouns)
//!
//! A dashboard holds containers, each container holds widgets. Every level
//! keeps fields it does not model in a raw `extra` map so documents written
//! by newer code survive a load/save cycle.

mod document;
mod widget;
mod version;

pub use document::{Dashboard, DashboardParam, ContainerWidget, ContainerConfig};
pub use widget::{Widget, WidgetLayout, ChartConfig, ChartOptions, Tooltip, Datasource, DatasourceConfig, ResultsConfig};
pub use version::SchemaVersionId;
