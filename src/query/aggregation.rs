//! Aggregation definitions for query properties

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Aggregation
// ============================================================================

/// Named aggregation functions applied to the `value` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregation {
    /// Average of values
    Avg,
    /// Count of rows
    Count,
    /// Last value seen
    Last,
    /// Maximum value
    Max,
    /// Arithmetic mean
    Mean,
    /// Minimum value
    Min,
    /// Standard deviation
    Stddev,
    /// Sum of values
    Sum,
    /// Variance
    Variance,
}

impl Aggregation {
    /// All named aggregations, in display order
    pub const ALL: [Aggregation; 9] = [
        Aggregation::Avg,
        Aggregation::Count,
        Aggregation::Last,
        Aggregation::Max,
        Aggregation::Mean,
        Aggregation::Min,
        Aggregation::Stddev,
        Aggregation::Sum,
        Aggregation::Variance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Avg => "avg",
            Aggregation::Count => "count",
            Aggregation::Last => "last",
            Aggregation::Max => "max",
            Aggregation::Mean => "mean",
            Aggregation::Min => "min",
            Aggregation::Stddev => "stddev",
            Aggregation::Sum => "sum",
            Aggregation::Variance => "variance",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when parsing an aggregation string
#[derive(Debug, Clone)]
pub struct ParseAggregationError {
    pub input: String,
}

impl fmt::Display for ParseAggregationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown aggregation '{}'. Valid options: avg, count, last, max, mean, min, stddev, sum, variance",
            self.input
        )
    }
}

impl std::error::Error for ParseAggregationError {}

impl FromStr for Aggregation {
    type Err = ParseAggregationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "avg" => Ok(Aggregation::Avg),
            "count" => Ok(Aggregation::Count),
            "last" => Ok(Aggregation::Last),
            "max" => Ok(Aggregation::Max),
            "mean" => Ok(Aggregation::Mean),
            "min" => Ok(Aggregation::Min),
            "stddev" => Ok(Aggregation::Stddev),
            "sum" => Ok(Aggregation::Sum),
            "variance" => Ok(Aggregation::Variance),
            _ => Err(ParseAggregationError { input: s.to_string() }),
        }
    }
}

impl<'de> Deserialize<'de> for Aggregation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Aggregation::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Aggregation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// AggregationSpec
// ============================================================================

/// One entry of `QueryProperties::aggregations`
///
/// Either a named aggregation, a percentile written as `<number>%`,
/// or any other token, which is passed through to the SQL unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationSpec {
    /// A member of the closed `Aggregation` enum
    Named(Aggregation),
    /// Percentile; holds the numeric text without the trailing `%`
    Percentile(String),
    /// Unrecognized aggregation token
    Other(String),
}

impl AggregationSpec {
    /// Percentile value, if this is a percentile aggregation within 0..=100
    pub fn percentile(&self) -> Option<f64> {
        match self {
            AggregationSpec::Percentile(p) => parse_percentile(p),
            _ => None,
        }
    }

    /// Whether this came from the closed aggregation set or a valid percentile
    pub fn is_known(&self) -> bool {
        match self {
            AggregationSpec::Named(_) => true,
            AggregationSpec::Percentile(_) => self.percentile().is_some(),
            AggregationSpec::Other(_) => false,
        }
    }
}

impl From<Aggregation> for AggregationSpec {
    fn from(agg: Aggregation) -> Self {
        AggregationSpec::Named(agg)
    }
}

impl fmt::Display for AggregationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationSpec::Named(agg) => write!(f, "{}", agg),
            AggregationSpec::Percentile(p) => write!(f, "{}%", p),
            AggregationSpec::Other(token) => write!(f, "{}", token),
        }
    }
}

impl FromStr for AggregationSpec {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(agg) = s.parse::<Aggregation>() {
            return Ok(AggregationSpec::Named(agg));
        }

        if let Some(number) = s.strip_suffix('%') {
            let number = number.trim();
            if parse_percentile(number).is_some() {
                return Ok(AggregationSpec::Percentile(number.to_string()));
            }
        }

        Ok(AggregationSpec::Other(s.to_string()))
    }
}

/// Plain decimal text in 0..=100; signs and exponents are rejected
fn parse_percentile(text: &str) -> Option<f64> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    text.parse::<f64>()
        .ok()
        .filter(|p| (0.0..=100.0).contains(p))
}

impl<'de> Deserialize<'de> for AggregationSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse::<AggregationSpec>().unwrap_or_else(|never| match never {}))
    }
}

impl Serialize for AggregationSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
