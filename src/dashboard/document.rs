//! Dashboard and container types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use super::version::SchemaVersionId;
use super::widget::Widget;

/// Root of a persisted dashboard document
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Dashboard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Last schema version this document was migrated to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<SchemaVersionId>,
    /// Dashboard-level parameters substituted into widget queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<DashboardParam>>,
    /// Containers, in display order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ContainerWidget>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named dashboard parameter
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DashboardParam {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A layout grouping of widgets
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ContainerWidget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Container layout and its widgets
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ContainerConfig {
    /// `row`, `column` or `wrap`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Widget>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dashboard {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            children: Some(Vec::new()),
            ..Default::default()
        }
    }

    pub fn with_container(mut self, container: ContainerWidget) -> Self {
        self.children.get_or_insert_with(Vec::new).push(container);
        self
    }

    /// Containers in document order (empty if `children` is missing)
    pub fn containers(&self) -> impl Iterator<Item = &ContainerWidget> {
        self.children.iter().flatten()
    }

    /// Every widget of every container, in document order
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.containers().flat_map(|c| c.widgets())
    }

    pub fn widget_count(&self) -> usize {
        self.widgets().count()
    }

    /// Parse from an already-deserialized JSON value
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl ContainerWidget {
    /// Container holding `widgets`, with no layout settings
    pub fn with_widgets(widgets: Vec<Widget>) -> Self {
        Self {
            container: Some(ContainerConfig {
                children: Some(widgets),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.container
            .iter()
            .flat_map(|c| c.children.iter().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = json!({
            "id": "d1",
            "title": "Network",
            "owner": "someone@example.com",
            "children": [{
                "id": "c1",
                "container": {"flow": "row", "children": [], "gridSnap": 4},
                "collapsed": true
            }]
        });
        let dashboard = Dashboard::from_value(raw.clone()).unwrap();

        assert_eq!(dashboard.extra.get("owner"), Some(&json!("someone@example.com")));
        assert_eq!(dashboard.to_value().unwrap(), raw);
    }

    #[test]
    fn test_version_accepts_number() {
        let dashboard = Dashboard::from_value(json!({"version": 4, "children": []})).unwrap();
        assert_eq!(dashboard.version, Some(SchemaVersionId(4)));
    }

    #[test]
    fn test_widget_iteration_order() {
        let raw = json!({"children": [
            {"container": {"children": [{"id": "w1"}, {"id": "w2"}]}},
            {"container": {}},
            {"container": {"children": [{"id": "w3"}]}}
        ]});
        let dashboard = Dashboard::from_value(raw).unwrap();
        let ids: Vec<_> = dashboard.widgets().filter_map(|w| w.id.as_deref()).collect();
        assert_eq!(ids, vec!["w1", "w2", "w3"]);
        assert_eq!(dashboard.widget_count(), 3);
    }

    #[test]
    fn test_missing_children_iterates_nothing() {
        let dashboard = Dashboard::from_value(json!({"title": "empty"})).unwrap();
        assert!(dashboard.children.is_none());
        assert_eq!(dashboard.containers().count(), 0);
    }
}
