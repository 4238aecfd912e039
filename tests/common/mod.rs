//! Shared test utilities for integration tests

#![allow(dead_code)]

use dashquery::{
    parser, Aggregation, AggregationSpec, Dashboard, Filter, FilterClause, MatchRule, QueryProperties,
};

/// Install a test log subscriber once; honours RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Load query properties from the test_data directory
pub fn load_query(name: &str) -> QueryProperties {
    let path = format!("test_data/{}", name);
    parser::parse_query_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load test data {}: {}", name, e))
}

/// Load a dashboard document from the test_data directory
pub fn load_dashboard(name: &str) -> Dashboard {
    let path = format!("test_data/{}", name);
    parser::parse_dashboard_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load test data {}: {}", name, e))
}

/// Canned query properties used across tests
pub struct SampleQueryProperties;

impl SampleQueryProperties {
    /// Two aggregations, a COLUMN field aliased `alias-1`, a HIDDEN field
    /// equal to "string-value", a COLUMN metadata key and a HIDDEN metadata
    /// key equal to 2
    pub fn basic_select_where_agg() -> QueryProperties {
        QueryProperties::new()
            .with_aggregation(Aggregation::Mean)
            .with_aggregation(AggregationSpec::Other("std".into()))
            .with_field_filter(Filter::column("field1").with_alias("alias-1"))
            .with_field_filter(
                Filter::hidden("field2").with_clause(FilterClause::new(MatchRule::Eq, "string-value")),
            )
            .with_metadata_filter(Filter::column("meta1"))
            .with_metadata_filter(Filter::hidden("meta2").with_clause(FilterClause::new(MatchRule::Eq, 2)))
    }

    /// Field selection only, no aggregation
    pub fn basic_select() -> QueryProperties {
        QueryProperties::new()
            .with_field_filter(Filter::column("field1"))
            .with_field_filter(Filter::column("field2").with_alias("second"))
            .with_metadata_filter(Filter::column("meta1"))
    }

    /// A HIDDEN filter with two OR-joined clauses
    pub fn or_clauses() -> QueryProperties {
        QueryProperties::new().with_field_filter(
            Filter::hidden("field3")
                .with_clause(FilterClause::new(MatchRule::Gt, 2))
                .with_clause(FilterClause::new(MatchRule::Lt, 0)),
        )
    }
}
