//! Full statement building from query properties

use tracing::trace;
use crate::query::QueryProperties;
use super::clauses::{build_group_args, build_select_args, build_where_args};
use super::error::BuildError;
use super::format::format_query;
use super::identifier::validate_properties;

/// Where a query reads from and how its rows are ordered and capped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryTarget {
    pub from: Vec<String>,
    pub order_by: Vec<String>,
    pub row_limit: Option<u64>,
}

impl QueryTarget {
    pub fn from_table(table: impl Into<String>) -> Self {
        Self {
            from: vec![table.into()],
            ..Default::default()
        }
    }

    pub fn with_order_by(mut self, item: impl Into<String>) -> Self {
        self.order_by.push(item.into());
        self
    }

    pub fn with_row_limit(mut self, limit: u64) -> Self {
        self.row_limit = Some(limit);
        self
    }
}

/// Compile `properties` against `target` into one formatted statement.
///
/// Identifiers are templated as given; see `build_query_checked`.
pub fn build_query(properties: &QueryProperties, target: &QueryTarget) -> String {
    let select_args = build_select_args(properties);
    let where_args = build_where_args(properties);
    let group_args = build_group_args(properties);

    trace!(
        select = select_args.len(),
        filters = where_args.len(),
        groups = group_args.len(),
        "assembling query"
    );

    format_query(
        &select_args,
        &target.from,
        Some(where_args.as_slice()),
        Some(group_args.as_slice()),
        Some(target.order_by.as_slice()),
        target.row_limit,
    )
}

/// Like `build_query`, but rejects unsafe identifiers, empty SELECT lists
/// and missing FROM sources.
pub fn build_query_checked(properties: &QueryProperties, target: &QueryTarget) -> Result<String, BuildError> {
    validate_properties(properties)?;

    if target.from.is_empty() {
        return Err(BuildError::NoSource);
    }
    if build_select_args(properties).is_empty() {
        return Err(BuildError::NoSelectColumns);
    }

    Ok(build_query(properties, target))
}
