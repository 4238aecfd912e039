//! Query builder module
//!
//! Compiles `QueryProperties` into SQL text:
//! - Clause arguments: SELECT, WHERE and GROUP BY fragments from filters and aggregations
//! - Formatting: assembles fragments into one tab-indented statement
//! - Checked building: validates identifiers before templating

mod error;
mod clauses;
mod format;
mod identifier;
mod query;

pub use error::BuildError;
pub use clauses::{
    get_regexp_for_metadata,
    build_select_args,
    build_where_args,
    build_group_args,
    aggregation_column,
    quote_operand,
};
pub use format::format_query;
pub use identifier::{is_valid_identifier, validate_properties};
pub use query::{build_query, build_query_checked, QueryTarget};
