//! QueryProperties, Filter and FilterClause

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use super::aggregation::AggregationSpec;

/// Declarative description of a widget's tabular query
///
/// Order of `field_filters` and `metadata_filters` is significant: it
/// determines the SELECT and GROUP BY column order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryProperties {
    #[serde(default)]
    pub aggregations: Vec<AggregationSpec>,
    /// Filters/selections over raw fields
    #[serde(default)]
    pub field_filters: Vec<Filter>,
    /// Filters/selections over keys packed into the `labels` column
    #[serde(default)]
    pub metadata_filters: Vec<Filter>,
}

impl QueryProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aggregation(mut self, aggregation: impl Into<AggregationSpec>) -> Self {
        self.aggregations.push(aggregation.into());
        self
    }

    pub fn with_field_filter(mut self, filter: Filter) -> Self {
        self.field_filters.push(filter);
        self
    }

    pub fn with_metadata_filter(mut self, filter: Filter) -> Self {
        self.metadata_filters.push(filter);
        self
    }

    pub fn is_aggregated(&self) -> bool {
        !self.aggregations.is_empty()
    }
}

/// Whether a filter contributes a SELECT column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DisplayMode {
    /// Included in SELECT (and GROUP BY when aggregated)
    #[default]
    Column,
    /// Only applied to WHERE
    Hidden,
}

/// A named predicate over a field or metadata key
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub field_name: String,
    /// OR-joined clauses; empty means "select, don't filter"
    #[serde(default)]
    pub filter_clauses: Vec<FilterClause>,
    #[serde(default)]
    pub display_mode: DisplayMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_alias: Option<String>,
}

impl Filter {
    /// A filter shown as a SELECT column
    pub fn column(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            filter_clauses: Vec::new(),
            display_mode: DisplayMode::Column,
            field_alias: None,
        }
    }

    /// A filter applied only to WHERE
    pub fn hidden(field_name: impl Into<String>) -> Self {
        Self {
            display_mode: DisplayMode::Hidden,
            ..Self::column(field_name)
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.field_alias = Some(alias.into());
        self
    }

    pub fn with_clause(mut self, clause: FilterClause) -> Self {
        self.filter_clauses.push(clause);
        self
    }

    pub fn is_column(&self) -> bool {
        self.display_mode == DisplayMode::Column
    }

    /// Name this filter's column carries in SELECT output
    pub fn output_name(&self) -> &str {
        self.field_alias.as_deref().unwrap_or(&self.field_name)
    }
}

/// One comparison inside a filter
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterClause {
    pub match_on: Vec<MatchOperand>,
    pub match_rule: MatchRule,
    /// Operands are emitted as-is (e.g. a function call) rather than quoted
    #[serde(default)]
    pub is_function: bool,
}

impl FilterClause {
    pub fn new(match_rule: MatchRule, operand: impl Into<MatchOperand>) -> Self {
        Self {
            match_on: vec![operand.into()],
            match_rule,
            is_function: false,
        }
    }

    /// Clause with several operands. Only some match rules make sense with
    /// more than one; this is not checked.
    pub fn any_of<I, T>(match_rule: MatchRule, operands: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<MatchOperand>,
    {
        Self {
            match_on: operands.into_iter().map(Into::into).collect(),
            match_rule,
            is_function: false,
        }
    }

    /// Clause whose operand is an unquoted expression
    pub fn function(match_rule: MatchRule, expression: impl Into<String>) -> Self {
        Self {
            match_on: vec![MatchOperand::Text(expression.into())],
            match_rule,
            is_function: true,
        }
    }
}

/// Comparison operand: a JSON number or a string
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MatchOperand {
    Number(serde_json::Number),
    Text(String),
}

impl From<&str> for MatchOperand {
    fn from(s: &str) -> Self {
        MatchOperand::Text(s.to_string())
    }
}

impl From<String> for MatchOperand {
    fn from(s: String) -> Self {
        MatchOperand::Text(s)
    }
}

impl From<i64> for MatchOperand {
    fn from(n: i64) -> Self {
        MatchOperand::Number(n.into())
    }
}

impl From<i32> for MatchOperand {
    fn from(n: i32) -> Self {
        MatchOperand::Number(i64::from(n).into())
    }
}

impl From<f64> for MatchOperand {
    fn from(n: f64) -> Self {
        // NaN and infinities have no JSON number form
        match serde_json::Number::from_f64(n) {
            Some(num) => MatchOperand::Number(num),
            None => MatchOperand::Text(n.to_string()),
        }
    }
}

impl fmt::Display for MatchOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOperand::Number(n) => write!(f, "{}", n),
            MatchOperand::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Comparison operators for filter clauses
///
/// Serialized as two-letter codes. Unknown codes are kept verbatim in
/// `Custom` and written into the WHERE text unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchRule {
    /// CONTAINS
    Ct,
    /// =
    Eq,
    /// >
    Gt,
    /// >=
    Ge,
    /// <
    Lt,
    /// <=
    Le,
    /// !=
    Ne,
    Custom(String),
}

impl MatchRule {
    /// Serialized code, e.g. `EQ`
    pub fn code(&self) -> &str {
        match self {
            MatchRule::Ct => "CT",
            MatchRule::Eq => "EQ",
            MatchRule::Gt => "GT",
            MatchRule::Ge => "GE",
            MatchRule::Lt => "LT",
            MatchRule::Le => "LE",
            MatchRule::Ne => "NE",
            MatchRule::Custom(code) => code,
        }
    }

    /// SQL operator text, e.g. `=`
    pub fn as_sql(&self) -> &str {
        match self {
            MatchRule::Ct => "CONTAINS",
            MatchRule::Eq => "=",
            MatchRule::Gt => ">",
            MatchRule::Ge => ">=",
            MatchRule::Lt => "<",
            MatchRule::Le => "<=",
            MatchRule::Ne => "!=",
            MatchRule::Custom(code) => code,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "CT" => MatchRule::Ct,
            "EQ" => MatchRule::Eq,
            "GT" => MatchRule::Gt,
            "GE" => MatchRule::Ge,
            "LT" => MatchRule::Lt,
            "LE" => MatchRule::Le,
            "NE" => MatchRule::Ne,
            other => MatchRule::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}

impl<'de> Deserialize<'de> for MatchRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(MatchRule::from_code(&s))
    }
}

impl Serialize for MatchRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Aggregation;

    #[test]
    fn test_deserialize_properties() {
        let json = r#"{
            "aggregations": ["mean", "99%"],
            "fieldFilters": [
                {"fieldName": "field1", "displayMode": "COLUMN", "fieldAlias": "alias-1"},
                {"fieldName": "field2", "displayMode": "HIDDEN",
                 "filterClauses": [{"matchOn": ["string-value"], "matchRule": "EQ"}]}
            ],
            "metadataFilters": [
                {"fieldName": "meta2", "displayMode": "HIDDEN",
                 "filterClauses": [{"matchOn": [2], "matchRule": "EQ"}]}
            ]
        }"#;
        let props: QueryProperties = serde_json::from_str(json).unwrap();

        assert_eq!(props.aggregations[0], AggregationSpec::Named(Aggregation::Mean));
        assert_eq!(props.aggregations[1], AggregationSpec::Percentile("99".into()));
        assert_eq!(props.field_filters[0].output_name(), "alias-1");
        assert!(props.field_filters[0].filter_clauses.is_empty());
        assert_eq!(props.field_filters[1].display_mode, DisplayMode::Hidden);
        assert_eq!(
            props.field_filters[1].filter_clauses[0],
            FilterClause::new(MatchRule::Eq, "string-value")
        );
        assert_eq!(props.metadata_filters[0].filter_clauses[0].match_on[0], MatchOperand::from(2));
    }

    #[test]
    fn test_defaults_when_fields_absent() {
        let props: QueryProperties = serde_json::from_str("{}").unwrap();
        assert_eq!(props, QueryProperties::default());

        let filter: Filter = serde_json::from_str(r#"{"fieldName": "f"}"#).unwrap();
        assert_eq!(filter, Filter::column("f"));
    }

    #[test]
    fn test_unknown_match_rule_kept_verbatim() {
        let clause: FilterClause =
            serde_json::from_str(r#"{"matchOn": ["x"], "matchRule": "LIKE"}"#).unwrap();
        assert_eq!(clause.match_rule, MatchRule::Custom("LIKE".into()));
        assert_eq!(clause.match_rule.as_sql(), "LIKE");
        assert_eq!(serde_json::to_string(&clause.match_rule).unwrap(), r#""LIKE""#);
    }

    #[test]
    fn test_match_rule_sql() {
        assert_eq!(MatchRule::Ct.to_string(), "CONTAINS");
        assert_eq!(MatchRule::Ge.to_string(), ">=");
        assert_eq!(MatchRule::Ne.to_string(), "!=");
        assert_eq!(MatchRule::from_code("LE"), MatchRule::Le);
    }

    #[test]
    fn test_operand_display() {
        assert_eq!(MatchOperand::from(2).to_string(), "2");
        assert_eq!(MatchOperand::from(2.5).to_string(), "2.5");
        assert_eq!(MatchOperand::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_serialize_omits_missing_alias() {
        let json = serde_json::to_value(Filter::hidden("f")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"fieldName": "f", "filterClauses": [], "displayMode": "HIDDEN"})
        );
    }
}
