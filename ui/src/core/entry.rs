//! A single metric reading and the value shapes it can carry.

use serde::{Deserialize, Serialize};

/// Provenance label used for values typed into the entry dialog.
pub const MANUAL_SOURCE: &str = "manual entry";

/// Milliseconds since the Unix epoch. All instants in the store use this unit
/// so blobs stay compatible with `Date.getTime()`-style data.
pub type EpochMillis = i64;

/// Value recorded for a metric. Serialized untagged so the JSON shape stays
/// `number | boolean | null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Flag(bool),
    #[default]
    Empty,
}

impl MetricValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, MetricValue::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            MetricValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Lenient conversion from an arbitrary JSON value (legacy day records
    /// store loosely typed fields). Anything that isn't a number or boolean
    /// counts as empty.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map(MetricValue::Number).unwrap_or_default(),
            serde_json::Value::Bool(b) => MetricValue::Flag(*b),
            _ => MetricValue::Empty,
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<bool> for MetricValue {
    fn from(value: bool) -> Self {
        MetricValue::Flag(value)
    }
}

impl From<Option<f64>> for MetricValue {
    fn from(value: Option<f64>) -> Self {
        value.map(MetricValue::Number).unwrap_or_default()
    }
}

/// One metric reading at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Instant the reading applies to. User-editable.
    #[serde(alias = "ts")]
    pub timestamp: EpochMillis,
    #[serde(default)]
    pub value: MetricValue,
    /// Instant the entry was saved.
    #[serde(default)]
    pub recorded_at: EpochMillis,
    #[serde(default = "default_source")]
    pub source: String,
}

impl Entry {
    pub fn new(
        timestamp: EpochMillis,
        value: MetricValue,
        recorded_at: EpochMillis,
        source: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            value,
            recorded_at,
            source: source.into(),
        }
    }

    pub fn manual(timestamp: EpochMillis, value: MetricValue, recorded_at: EpochMillis) -> Self {
        Self::new(timestamp, value, recorded_at, MANUAL_SOURCE)
    }
}

fn default_source() -> String {
    MANUAL_SOURCE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_json_shape_is_plain() {
        assert_eq!(serde_json::to_value(MetricValue::Number(172.5)).unwrap(), json!(172.5));
        assert_eq!(serde_json::to_value(MetricValue::Flag(true)).unwrap(), json!(true));
        assert_eq!(serde_json::to_value(MetricValue::Empty).unwrap(), json!(null));
    }

    #[test]
    fn legacy_entry_with_ts_field_loads() {
        let entry: Entry = serde_json::from_value(json!({ "ts": 1_700_000_000_000_i64, "value": 76 })).unwrap();
        assert_eq!(entry.timestamp, 1_700_000_000_000);
        assert_eq!(entry.value, MetricValue::Number(76.0));
        assert_eq!(entry.source, MANUAL_SOURCE);
        assert_eq!(entry.recorded_at, 0);
    }

    #[test]
    fn from_json_ignores_strings() {
        assert_eq!(MetricValue::from_json(&json!("120")), MetricValue::Empty);
        assert_eq!(MetricValue::from_json(&json!(false)), MetricValue::Flag(false));
    }
}
