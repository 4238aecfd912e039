//! Document parser (verb module)
//!
//! Loads query properties from YAML and dashboards from JSON.

use std::path::Path;
use crate::dashboard::Dashboard;
use crate::error::ParseError;
use crate::query::QueryProperties;

fn read(path: &Path) -> Result<String, ParseError> {
    std::fs::read_to_string(path).map_err(|e| ParseError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Parse query properties from a YAML file
pub fn parse_query_file<P: AsRef<Path>>(path: P) -> Result<QueryProperties, ParseError> {
    parse_query_str(&read(path.as_ref())?)
}

/// Parse query properties from a YAML string.
///
/// JSON is valid YAML, so JSON text is accepted as well.
pub fn parse_query_str(yaml: &str) -> Result<QueryProperties, ParseError> {
    serde_yaml::from_str(yaml).map_err(ParseError::from)
}

/// Parse a dashboard document from a JSON file
pub fn parse_dashboard_file<P: AsRef<Path>>(path: P) -> Result<Dashboard, ParseError> {
    parse_dashboard_str(&read(path.as_ref())?)
}

/// Parse a dashboard document from a JSON string
pub fn parse_dashboard_str(json: &str) -> Result<Dashboard, ParseError> {
    serde_json::from_str(json).map_err(ParseError::from)
}

/// Serialize a dashboard as pretty-printed JSON
pub fn dashboard_to_string(dashboard: &Dashboard) -> Result<String, ParseError> {
    serde_json::to_string_pretty(dashboard).map_err(ParseError::from)
}
