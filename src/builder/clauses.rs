//! Clause argument builders
//!
//! Each function returns the ordered list of items for one SQL clause.
//! Field filters always come before metadata filters, and both keep
//! their array order.

use crate::query::{AggregationSpec, Filter, FilterClause, MatchOperand, QueryProperties};

/// Column holding packed `|key:value|` metadata
const METADATA_COLUMN: &str = "labels";

/// Column every aggregation is applied to
const VALUE_COLUMN: &str = "value";

/// Bucket count for percentile approximation (0.1 resolution)
const QUANTILE_BUCKETS: u32 = 1001;

/// Expression projecting one key out of the packed metadata column.
///
/// `field_name` is templated verbatim; it must already be a safe identifier.
pub fn get_regexp_for_metadata(field_name: &str) -> String {
    format!("REGEXP_EXTRACT({}, r\"|{}:(.*?)|\")", METADATA_COLUMN, field_name)
}

/// SELECT items: field columns, then metadata columns, then aggregations.
///
/// HIDDEN filters contribute nothing.
pub fn build_select_args(properties: &QueryProperties) -> Vec<String> {
    let mut args = Vec::new();

    for filter in properties.field_filters.iter().filter(|f| f.is_column()) {
        match &filter.field_alias {
            Some(alias) => args.push(format!("{} AS {}", filter.field_name, alias)),
            None => args.push(filter.field_name.clone()),
        }
    }

    for filter in properties.metadata_filters.iter().filter(|f| f.is_column()) {
        args.push(format!(
            "{} AS {}",
            get_regexp_for_metadata(&filter.field_name),
            filter.output_name()
        ));
    }

    args.extend(properties.aggregations.iter().map(aggregation_column));
    args
}

/// WHERE items, one per filter that has clauses, regardless of display mode.
///
/// A filter with several clauses becomes a parenthesized OR group.
pub fn build_where_args(properties: &QueryProperties) -> Vec<String> {
    let fields = properties
        .field_filters
        .iter()
        .map(|f| (f.field_name.clone(), f));
    let metadata = properties
        .metadata_filters
        .iter()
        .map(|f| (get_regexp_for_metadata(&f.field_name), f));

    fields
        .chain(metadata)
        .filter_map(|(identifier, filter)| filter_predicate(&identifier, filter))
        .collect()
}

/// GROUP BY items: the SELECT output name of every COLUMN filter.
///
/// Empty when the query has no aggregations.
pub fn build_group_args(properties: &QueryProperties) -> Vec<String> {
    if !properties.is_aggregated() {
        return Vec::new();
    }

    properties
        .field_filters
        .iter()
        .chain(properties.metadata_filters.iter())
        .filter(|f| f.is_column())
        .map(|f| f.output_name().to_string())
        .collect()
}

/// SELECT item for one aggregation
///
/// Named and unrecognized aggregations become `NAME(value) AS name`;
/// percentiles use an approximate quantile lookup.
pub fn aggregation_column(spec: &AggregationSpec) -> String {
    match spec {
        AggregationSpec::Named(agg) => simple_aggregation(agg.as_str()),
        AggregationSpec::Other(token) => simple_aggregation(token),
        AggregationSpec::Percentile(text) => match spec.percentile() {
            Some(p) => {
                // 1..=QUANTILE_BUCKETS for p in 0..=100
                let rank = (p.clamp(0.0, 100.0) * 10.0).round() as u32 + 1;
                format!(
                    "NTH({}, QUANTILES({}, {})) AS p{}",
                    rank,
                    VALUE_COLUMN,
                    QUANTILE_BUCKETS,
                    text.replace('.', "_")
                )
            }
            None => simple_aggregation(&spec.to_string()),
        },
    }
}

fn simple_aggregation(name: &str) -> String {
    format!("{}({}) AS {}", name.to_uppercase(), VALUE_COLUMN, name)
}

/// Render one operand for a WHERE comparison.
///
/// Numbers and function expressions are emitted as-is; strings are
/// double-quoted with `\` and `"` escaped.
pub fn quote_operand(operand: &MatchOperand, is_function: bool) -> String {
    match operand {
        MatchOperand::Number(n) => n.to_string(),
        MatchOperand::Text(s) if is_function => s.clone(),
        MatchOperand::Text(s) => {
            let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{}\"", escaped)
        }
    }
}

fn filter_predicate(identifier: &str, filter: &Filter) -> Option<String> {
    match filter.filter_clauses.as_slice() {
        [] => None,
        [clause] => Some(clause_predicate(identifier, clause)),
        clauses => {
            let parts: Vec<String> = clauses
                .iter()
                .map(|c| clause_predicate(identifier, c))
                .collect();
            Some(format!("({})", parts.join(" OR ")))
        }
    }
}

fn clause_predicate(identifier: &str, clause: &FilterClause) -> String {
    let operand = match clause.match_on.as_slice() {
        [single] => quote_operand(single, clause.is_function),
        many => {
            let items: Vec<String> = many
                .iter()
                .map(|o| quote_operand(o, clause.is_function))
                .collect();
            format!("({})", items.join(", "))
        }
    };
    format!("{} {} {}", identifier, clause.match_rule.as_sql(), operand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Aggregation, MatchRule};

    fn basic_select_where_agg() -> QueryProperties {
        QueryProperties::new()
            .with_aggregation(Aggregation::Mean)
            .with_aggregation(AggregationSpec::Other("std".into()))
            .with_field_filter(Filter::column("field1").with_alias("alias-1"))
            .with_field_filter(
                Filter::hidden("field2").with_clause(FilterClause::new(MatchRule::Eq, "string-value")),
            )
            .with_metadata_filter(Filter::column("meta1"))
            .with_metadata_filter(
                Filter::hidden("meta2").with_clause(FilterClause::new(MatchRule::Eq, 2)),
            )
    }

    // -- metadata -------------------------------------------------------------

    #[test]
    fn test_regexp_for_metadata() {
        assert_eq!(
            get_regexp_for_metadata("field"),
            r#"REGEXP_EXTRACT(labels, r"|field:(.*?)|")"#
        );
        assert_eq!(get_regexp_for_metadata("field"), get_regexp_for_metadata("field"));
    }

    // -- select ---------------------------------------------------------------

    #[test]
    fn test_select_args() {
        assert_eq!(
            build_select_args(&basic_select_where_agg()),
            vec![
                "field1 AS alias-1".to_string(),
                r#"REGEXP_EXTRACT(labels, r"|meta1:(.*?)|") AS meta1"#.to_string(),
                "MEAN(value) AS mean".to_string(),
                "STD(value) AS std".to_string(),
            ]
        );
    }

    #[test]
    fn test_select_metadata_alias() {
        let props = QueryProperties::new()
            .with_field_filter(Filter::column("product"))
            .with_metadata_filter(Filter::column("machine_type").with_alias("machine"));
        assert_eq!(
            build_select_args(&props),
            vec![
                "product".to_string(),
                r#"REGEXP_EXTRACT(labels, r"|machine_type:(.*?)|") AS machine"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_select_skips_hidden() {
        let props = QueryProperties::new()
            .with_field_filter(Filter::hidden("a"))
            .with_metadata_filter(Filter::hidden("b"));
        assert!(build_select_args(&props).is_empty());
    }

    #[test]
    fn test_percentile_column() {
        assert_eq!(
            aggregation_column(&"99%".parse().unwrap()),
            "NTH(991, QUANTILES(value, 1001)) AS p99"
        );
        assert_eq!(
            aggregation_column(&"99.9%".parse().unwrap()),
            "NTH(1000, QUANTILES(value, 1001)) AS p99_9"
        );
        assert_eq!(
            aggregation_column(&"0%".parse().unwrap()),
            "NTH(1, QUANTILES(value, 1001)) AS p0"
        );
        assert_eq!(
            aggregation_column(&"100%".parse().unwrap()),
            "NTH(1001, QUANTILES(value, 1001)) AS p100"
        );
    }

    #[test]
    fn test_percentile_out_of_range_is_not_a_quantile() {
        for token in ["150%", "-5%", "1e18%"] {
            let column = aggregation_column(&token.parse().unwrap());
            assert!(!column.contains("NTH("), "{} -> {}", token, column);
        }

        // Out-of-range text stored directly never ranks past the buckets
        for text in ["150", "-5", "1e18"] {
            let column = aggregation_column(&AggregationSpec::Percentile(text.into()));
            assert!(!column.contains("NTH("), "{} -> {}", text, column);
        }
    }

    #[test]
    fn test_named_aggregation_columns() {
        assert_eq!(aggregation_column(&Aggregation::Stddev.into()), "STDDEV(value) AS stddev");
        assert_eq!(aggregation_column(&Aggregation::Count.into()), "COUNT(value) AS count");
    }

    // -- where ----------------------------------------------------------------

    #[test]
    fn test_where_args() {
        assert_eq!(
            build_where_args(&basic_select_where_agg()),
            vec![
                r#"field2 = "string-value""#.to_string(),
                r#"REGEXP_EXTRACT(labels, r"|meta2:(.*?)|") = 2"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_where_or_wrapping() {
        let props = QueryProperties::new().with_field_filter(
            Filter::hidden("field3")
                .with_clause(FilterClause::new(MatchRule::Gt, 2))
                .with_clause(FilterClause::new(MatchRule::Lt, 0)),
        );
        assert_eq!(build_where_args(&props), vec!["(field3 > 2 OR field3 < 0)".to_string()]);
    }

    #[test]
    fn test_where_function_operand_unquoted() {
        let props = QueryProperties::new().with_field_filter(
            Filter::hidden("timestamp")
                .with_clause(FilterClause::function(MatchRule::Ge, "DATE_ADD(CURRENT_TIMESTAMP(), -7, 'DAY')")),
        );
        assert_eq!(
            build_where_args(&props),
            vec!["timestamp >= DATE_ADD(CURRENT_TIMESTAMP(), -7, 'DAY')".to_string()]
        );
    }

    #[test]
    fn test_where_contains_and_custom_rule() {
        let props = QueryProperties::new()
            .with_field_filter(Filter::column("test").with_clause(FilterClause::new(MatchRule::Ct, "iperf")))
            .with_field_filter(
                Filter::hidden("owner").with_clause(FilterClause::new(MatchRule::Custom("LIKE".into()), "a%")),
            );
        assert_eq!(
            build_where_args(&props),
            vec![r#"test CONTAINS "iperf""#.to_string(), r#"owner LIKE "a%""#.to_string()]
        );
    }

    #[test]
    fn test_where_multiple_operands_not_validated() {
        let props = QueryProperties::new().with_field_filter(
            Filter::hidden("zone").with_clause(FilterClause::any_of(MatchRule::Eq, ["us-east1", "us-west1"])),
        );
        assert_eq!(
            build_where_args(&props),
            vec![r#"zone = ("us-east1", "us-west1")"#.to_string()]
        );
    }

    #[test]
    fn test_quote_operand_escapes() {
        assert_eq!(quote_operand(&MatchOperand::from(r#"say "hi""#), false), r#""say \"hi\"""#);
        assert_eq!(quote_operand(&MatchOperand::from(r"a\b"), false), r#""a\\b""#);
        assert_eq!(quote_operand(&MatchOperand::from(1.5), false), "1.5");
        assert_eq!(quote_operand(&MatchOperand::from("NOW()"), true), "NOW()");
    }

    // -- group ----------------------------------------------------------------

    #[test]
    fn test_group_args_with_aggregations() {
        assert_eq!(
            build_group_args(&basic_select_where_agg()),
            vec!["alias-1".to_string(), "meta1".to_string()]
        );
    }

    #[test]
    fn test_group_args_empty_without_aggregations() {
        let mut props = basic_select_where_agg();
        props.aggregations.clear();
        assert!(build_group_args(&props).is_empty());
        assert!(build_group_args(&QueryProperties::default()).is_empty());
    }
}
