//! Widget types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::query::{AggregationSpec, Filter, QueryProperties};

/// A single chart, table or text unit
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Widget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<WidgetLayout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<Datasource>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Span of a widget inside its container grid
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WidgetLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columnspan: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rowspan: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "chartType", default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ChartOptions>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options handed to the charting collaborator
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ChartOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
    /// Older documents store a bare position string or a numeric code here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Tooltip {
    #[serde(rename = "isHtml", default, skip_serializing_if = "Option::is_none")]
    pub is_html: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Where a widget's data comes from
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Datasource {
    /// Last generated or hand-written query text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// True when `query` was written by hand and must not be regenerated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_query: Option<bool>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<DatasourceConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Query description stored on a widget
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<Vec<AggregationSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_filters: Option<Vec<Filter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_filters: Option<Vec<Filter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultsConfig>,
    /// Dashboard-level filter settings applied on top of the query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// How query results are shaped for display
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ResultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_date: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_limit: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Widget {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn with_config(mut self, config: DatasourceConfig) -> Self {
        self.datasource.get_or_insert_with(Datasource::default).config = Some(config);
        self
    }

    pub fn config(&self) -> Option<&DatasourceConfig> {
        self.datasource.as_ref()?.config.as_ref()
    }

    /// Query properties for the builder; missing lists are empty
    pub fn query_properties(&self) -> QueryProperties {
        self.config()
            .map(DatasourceConfig::query_properties)
            .unwrap_or_default()
    }

    /// Row limit from the results config, if any
    pub fn row_limit(&self) -> Option<u64> {
        self.config()?.results.as_ref()?.row_limit
    }

    pub fn has_custom_query(&self) -> bool {
        self.datasource
            .as_ref()
            .and_then(|d| d.custom_query)
            .unwrap_or(false)
    }
}

impl DatasourceConfig {
    pub fn query_properties(&self) -> QueryProperties {
        QueryProperties {
            aggregations: self.aggregations.clone().unwrap_or_default(),
            field_filters: self.field_filters.clone().unwrap_or_default(),
            metadata_filters: self.metadata_filters.clone().unwrap_or_default(),
        }
    }
}

impl From<QueryProperties> for DatasourceConfig {
    fn from(properties: QueryProperties) -> Self {
        Self {
            aggregations: Some(properties.aggregations),
            field_filters: Some(properties.field_filters),
            metadata_filters: Some(properties.metadata_filters),
            ..Default::default()
        }
    }
}
