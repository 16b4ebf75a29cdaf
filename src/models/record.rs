use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::WatchTarget;

/// ISO-8601 local time with microseconds, used for record stamps and output file names.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Field name to value mapping produced by an extractor for one product variant.
pub type Fields = BTreeMap<String, Value>;

pub const PRICE_FIELD: &str = "price";

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// A row carries a price when the field exists, is not null and is not blank text.
pub fn has_price(fields: &Fields) -> bool {
    match fields.get(PRICE_FIELD) {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.trim().is_empty(),
        Some(_) => true,
    }
}

/// Render a value the way it should appear in a tabular cell.
pub fn cell_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// One normalized observation of a product variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRecord {
    pub description: String,
    pub url: String,
    #[serde(with = "run_timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(flatten)]
    pub fields: Fields,
}

impl PriceRecord {
    pub fn new(target: &WatchTarget, timestamp: NaiveDateTime, fields: Fields) -> Self {
        Self {
            description: target.description.clone(),
            url: target.url.clone(),
            timestamp,
            fields,
        }
    }

    pub fn price(&self) -> Option<&Value> {
        self.fields.get(PRICE_FIELD).filter(|value| !value.is_null())
    }

    /// Look up a column by name, covering both injected and extracted fields.
    pub fn column(&self, name: &str) -> Option<String> {
        match name {
            "description" => Some(self.description.clone()),
            "url" => Some(self.url.clone()),
            "timestamp" => Some(format_timestamp(&self.timestamp)),
            field => self.fields.get(field).map(cell_value),
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        matches!(name, "description" | "url" | "timestamp") || self.fields.contains_key(name)
    }
}

/// Every record collected during one run, sharing the run timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub timestamp: NaiveDateTime,
    pub records: Vec<PriceRecord>,
}

impl RunOutput {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            records: Vec::new(),
        }
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = PriceRecord>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

mod run_timestamp {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&timestamp.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
