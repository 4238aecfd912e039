//! Load a stored dashboard, migrate it, then compile each widget's query

mod common;

use common::{init_tracing, load_dashboard};
use dashquery::{build_query, build_query_checked, Migrator, QueryTarget};

#[test]
fn test_migrated_widgets_compile_to_sql() {
    init_tracing();
    let mut dashboard = load_dashboard("legacy_dashboard.json");
    Migrator::default().migrate(&mut dashboard).unwrap();

    let generated: Vec<String> = dashboard
        .widgets()
        .filter(|w| !w.has_custom_query())
        .map(|w| {
            let target = QueryTarget {
                from: vec!["samples.results".to_string()],
                order_by: Vec::new(),
                row_limit: w.row_limit(),
            };
            build_query_checked(&w.query_properties(), &target).unwrap()
        })
        .collect();

    assert_eq!(generated.len(), 1);
    assert_eq!(
        generated[0],
        "SELECT\n\
         \tproduct_name,\n\
         \tREGEXP_EXTRACT(labels, r\"|machine_type:(.*?)|\") AS machine,\n\
         \tMAX(value) AS max,\n\
         \tNTH(991, QUANTILES(value, 1001)) AS p99\n\
         FROM\n\
         \tsamples.results\n\
         WHERE\n\
         \ttest = \"iperf\"\n\
         GROUP BY\n\
         \tproduct_name,\n\
         \tmachine;"
    );
}

#[test]
fn test_widget_with_defaulted_config_selects_nothing() {
    let mut dashboard = load_dashboard("legacy_dashboard.json");
    Migrator::default().migrate(&mut dashboard).unwrap();

    // The hand-written widget got empty query lists from the migration
    let hand_written = dashboard.widgets().find(|w| w.has_custom_query()).unwrap();
    let props = hand_written.query_properties();
    assert!(props.aggregations.is_empty());
    assert!(props.field_filters.is_empty());

    let target = QueryTarget::from_table("t");
    assert!(build_query_checked(&props, &target).is_err());
    // The unchecked builder still produces text; callers decide what to do with it
    let sql = build_query(&props, &target);
    assert_eq!(sql, "SELECT\nFROM\n\tt;");
    assert!(!sql.contains("\t\n"));
}
