//! Built-in schema versions
//!
//! Each version adds or normalizes one part of the document. Later versions
//! assume the invariants of earlier ones hold.

use serde_json::{Map, Value};
use uuid::Uuid;
use crate::dashboard::{
    ChartConfig, ChartOptions, ContainerConfig, ContainerWidget, Dashboard, Datasource,
    DatasourceConfig, ResultsConfig, Tooltip, Widget, WidgetLayout,
};
use super::error::MigrationError;
use super::version::{SchemaVersion, Verification};
use super::walk::{update_containers, update_each_widget, update_widgets, verify_dashboard, verify_containers, verify_widgets};

pub const DEFAULT_FLOW: &str = "row";
pub const DEFAULT_COLUMNS: u32 = 1;
pub const DEFAULT_HEIGHT: u32 = 250;
pub const DEFAULT_SOURCE_TYPE: &str = "tabular";
pub const DEFAULT_LEGEND_POSITION: &str = "right";

/// Legacy numeric legend codes, by index
const LEGEND_POSITIONS: [&str; 6] = ["none", "right", "left", "top", "bottom", "in"];

/// The built-in catalogue, in ascending version order
pub fn all() -> Vec<SchemaVersion> {
    vec![
        SchemaVersion::new(1, "widget datasource config", verify_v1, update_v1),
        SchemaVersion::new(2, "widget layout spans", verify_v2, update_v2),
        SchemaVersion::new(3, "chart options", verify_v3, update_v3),
        SchemaVersion::new(4, "chart tooltip", verify_v4, update_v4),
        SchemaVersion::new(5, "legend position object", verify_v5, update_v5),
        SchemaVersion::new(6, "datasource results config", verify_v6, update_v6),
        SchemaVersion::new(7, "dashboard params", verify_v7, update_v7),
        SchemaVersion::new(8, "container layout", verify_v8, update_v8),
        SchemaVersion::new(9, "datasource type and custom query flag", verify_v9, update_v9),
        SchemaVersion::new(10, "query property lists", verify_v10, update_v10),
        SchemaVersion::new(11, "container and widget ids", verify_v11, update_v11),
        SchemaVersion::new(12, "datasource filters object", verify_v12, update_v12),
    ]
}

// ---------------------------------------------------------------------------
// 1: every widget has datasource.config
// ---------------------------------------------------------------------------

fn verify_v1(dashboard: &Dashboard) -> Result<Verification, MigrationError> {
    verify_widgets(dashboard, |w| Verification::require(w.config().is_some(), "datasource.config"))
}

fn update_v1(dashboard: &mut Dashboard) -> Result<(), MigrationError> {
    update_each_widget(dashboard, |w| {
        config_mut(w);
    })
}

// ---------------------------------------------------------------------------
// 2: every widget has layout.columnspan and layout.rowspan
// ---------------------------------------------------------------------------

fn verify_v2(dashboard: &Dashboard) -> Result<Verification, MigrationError> {
    verify_widgets(dashboard, |w| match &w.layout {
        None => Verification::MissingField("layout".into()),
        Some(layout) => Verification::require(layout.columnspan.is_some(), "layout.columnspan")
            .and_then(|| Verification::require(layout.rowspan.is_some(), "layout.rowspan")),
    })
}

fn update_v2(dashboard: &mut Dashboard) -> Result<(), MigrationError> {
    update_each_widget(dashboard, |w| {
        let layout = w.layout.get_or_insert_with(WidgetLayout::default);
        layout.columnspan.get_or_insert(1);
        layout.rowspan.get_or_insert(1);
    })
}

// ---------------------------------------------------------------------------
// 3: every widget has chart.options
// ---------------------------------------------------------------------------

fn verify_v3(dashboard: &Dashboard) -> Result<Verification, MigrationError> {
    verify_widgets(dashboard, |w| match &w.chart {
        None => Verification::MissingField("chart".into()),
        Some(chart) => Verification::require(chart.options.is_some(), "chart.options"),
    })
}

fn update_v3(dashboard: &mut Dashboard) -> Result<(), MigrationError> {
    update_each_widget(dashboard, |w| {
        chart_options_mut(w);
    })
}

// ---------------------------------------------------------------------------
// 4: chart options carry a tooltip
// ---------------------------------------------------------------------------

fn verify_v4(dashboard: &Dashboard) -> Result<Verification, MigrationError> {
    verify_widgets(dashboard, |w| {
        Verification::require(chart_options(w).is_some_and(|o| o.tooltip.is_some()), "chart.options.tooltip")
    })
}

fn update_v4(dashboard: &mut Dashboard) -> Result<(), MigrationError> {
    update_each_widget(dashboard, |w| {
        chart_options_mut(w).tooltip.get_or_insert_with(|| Tooltip {
            is_html: Some(true),
            ..Default::default()
        });
    })
}

// ---------------------------------------------------------------------------
// 5: legend is an object with a position
// ---------------------------------------------------------------------------

fn verify_v5(dashboard: &Dashboard) -> Result<Verification, MigrationError> {
    verify_widgets(dashboard, |w| {
        let ok = chart_options(w)
            .and_then(|o| o.legend.as_ref())
            .and_then(Value::as_object)
            .is_some_and(|legend| legend.contains_key("position"));
        Verification::require(ok, "chart.options.legend.position")
    })
}

fn update_v5(dashboard: &mut Dashboard) -> Result<(), MigrationError> {
    update_each_widget(dashboard, |w| {
        let options = chart_options_mut(w);
        let legend = options.legend.take().unwrap_or(Value::Null);
        options.legend = Some(normalize_legend(legend));
    })
}

/// Convert a legacy legend value into `{"position": ...}`.
///
/// Objects keep their other keys.
pub fn normalize_legend(legend: Value) -> Value {
    let position = match legend {
        Value::Object(mut map) => {
            if !map.contains_key("position") {
                map.insert("position".into(), Value::from(DEFAULT_LEGEND_POSITION));
            }
            return Value::Object(map);
        }
        Value::String(s) if !s.is_empty() => s,
        Value::Number(n) => n
            .as_u64()
            .and_then(|i| LEGEND_POSITIONS.get(i as usize))
            .unwrap_or(&DEFAULT_LEGEND_POSITION)
            .to_string(),
        Value::Bool(false) => "none".to_string(),
        _ => DEFAULT_LEGEND_POSITION.to_string(),
    };

    let mut map = Map::new();
    map.insert("position".into(), Value::String(position));
    Value::Object(map)
}

// ---------------------------------------------------------------------------
// 6: datasource config has a results object
// ---------------------------------------------------------------------------

fn verify_v6(dashboard: &Dashboard) -> Result<Verification, MigrationError> {
    verify_widgets(dashboard, |w| {
        Verification::require(w.config().is_some_and(|c| c.results.is_some()), "datasource.config.results")
    })
}

fn update_v6(dashboard: &mut Dashboard) -> Result<(), MigrationError> {
    update_each_widget(dashboard, |w| {
        config_mut(w).results.get_or_insert_with(|| ResultsConfig {
            pivot: Some(false),
            show_date: Some(false),
            ..Default::default()
        });
    })
}

// ---------------------------------------------------------------------------
// 7: dashboard has a params array
// ---------------------------------------------------------------------------

fn verify_v7(dashboard: &Dashboard) -> Result<Verification, MigrationError> {
    Ok(Verification::require(dashboard.params.is_some(), "params"))
}

fn update_v7(dashboard: &mut Dashboard) -> Result<(), MigrationError> {
    dashboard.params.get_or_insert_with(Vec::new);
    Ok(())
}

// ---------------------------------------------------------------------------
// 8: containers have flow, columns and height
// ---------------------------------------------------------------------------

fn verify_v8(dashboard: &Dashboard) -> Result<Verification, MigrationError> {
    verify_containers(dashboard, |c| match &c.container {
        None => Verification::MissingField("container".into()),
        Some(config) => Verification::require(config.flow.is_some(), "container.flow")
            .and_then(|| Verification::require(config.columns.is_some(), "container.columns"))
            .and_then(|| Verification::require(config.height.is_some(), "container.height")),
    })
}

fn update_v8(dashboard: &mut Dashboard) -> Result<(), MigrationError> {
    update_containers(dashboard, |c| {
        let config = c.container.get_or_insert_with(|| ContainerConfig {
            children: Some(Vec::new()),
            ..Default::default()
        });
        config.flow.get_or_insert_with(|| DEFAULT_FLOW.to_string());
        config.columns.get_or_insert(DEFAULT_COLUMNS);
        config.height.get_or_insert(DEFAULT_HEIGHT);
    })
}

// ---------------------------------------------------------------------------
// 9: datasource has type and custom_query
// ---------------------------------------------------------------------------

fn verify_v9(dashboard: &Dashboard) -> Result<Verification, MigrationError> {
    verify_widgets(dashboard, |w| match &w.datasource {
        None => Verification::MissingField("datasource".into()),
        Some(ds) => Verification::require(ds.source_type.is_some(), "datasource.type")
            .and_then(|| Verification::require(ds.custom_query.is_some(), "datasource.custom_query")),
    })
}

fn update_v9(dashboard: &mut Dashboard) -> Result<(), MigrationError> {
    update_each_widget(dashboard, |w| {
        let ds = w.datasource.get_or_insert_with(Datasource::default);
        ds.source_type.get_or_insert_with(|| DEFAULT_SOURCE_TYPE.to_string());
        // A stored query with no flag predates generated queries
        let hand_written = ds.query.as_deref().is_some_and(|q| !q.trim().is_empty());
        ds.custom_query.get_or_insert(hand_written);
    })
}

// ---------------------------------------------------------------------------
// 10: datasource config has aggregations, fieldFilters and metadataFilters
// ---------------------------------------------------------------------------

fn verify_v10(dashboard: &Dashboard) -> Result<Verification, MigrationError> {
    verify_widgets(dashboard, |w| match w.config() {
        None => Verification::MissingField("datasource.config".into()),
        Some(config) => Verification::require(config.aggregations.is_some(), "datasource.config.aggregations")
            .and_then(|| Verification::require(config.field_filters.is_some(), "datasource.config.fieldFilters"))
            .and_then(|| {
                Verification::require(config.metadata_filters.is_some(), "datasource.config.metadataFilters")
            }),
    })
}

fn update_v10(dashboard: &mut Dashboard) -> Result<(), MigrationError> {
    update_each_widget(dashboard, |w| {
        let config = config_mut(w);
        config.aggregations.get_or_insert_with(Vec::new);
        config.field_filters.get_or_insert_with(Vec::new);
        config.metadata_filters.get_or_insert_with(Vec::new);
    })
}

// ---------------------------------------------------------------------------
// 11: every container and widget has a non-empty id
// ---------------------------------------------------------------------------

fn verify_v11(dashboard: &Dashboard) -> Result<Verification, MigrationError> {
    verify_dashboard(
        dashboard,
        Some(&mut |c: &ContainerWidget| Verification::require(has_id(&c.id), "id")),
        Some(&mut |w: &Widget| Verification::require(has_id(&w.id), "id")),
    )
}

fn update_v11(dashboard: &mut Dashboard) -> Result<(), MigrationError> {
    update_widgets(
        dashboard,
        Some(&mut |c: &mut ContainerWidget| assign_id(&mut c.id)),
        Some(&mut |w: &mut Widget| assign_id(&mut w.id)),
    )
}

fn has_id(id: &Option<String>) -> bool {
    id.as_deref().is_some_and(|s| !s.is_empty())
}

fn assign_id(id: &mut Option<String>) {
    if !has_id(id) {
        *id = Some(Uuid::new_v4().to_string());
    }
}

// ---------------------------------------------------------------------------
// 12: datasource config has a filters object
// ---------------------------------------------------------------------------

fn verify_v12(dashboard: &Dashboard) -> Result<Verification, MigrationError> {
    verify_widgets(dashboard, |w| {
        Verification::require(w.config().is_some_and(|c| c.filters.is_some()), "datasource.config.filters")
    })
}

fn update_v12(dashboard: &mut Dashboard) -> Result<(), MigrationError> {
    update_each_widget(dashboard, |w| {
        config_mut(w).filters.get_or_insert_with(Map::new);
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config_mut(widget: &mut Widget) -> &mut DatasourceConfig {
    widget
        .datasource
        .get_or_insert_with(Datasource::default)
        .config
        .get_or_insert_with(DatasourceConfig::default)
}

fn chart_options(widget: &Widget) -> Option<&ChartOptions> {
    widget.chart.as_ref()?.options.as_ref()
}

fn chart_options_mut(widget: &mut Widget) -> &mut ChartOptions {
    widget
        .chart
        .get_or_insert_with(ChartConfig::default)
        .options
        .get_or_insert_with(ChartOptions::default)
}
