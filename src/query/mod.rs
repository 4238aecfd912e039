//! Query properties types (nouns)
//!
//! The declarative description of what data a widget requests.

mod aggregation;
mod properties;

pub use aggregation::{Aggregation, AggregationSpec, ParseAggregationError};
pub use properties::{QueryProperties, Filter, FilterClause, DisplayMode, MatchRule, MatchOperand};
