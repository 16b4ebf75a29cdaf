//! Normalization of embedded variant payloads.
//!
//! Retailers embed a JSON document describing every purchasable variant of a
//! product. Each variant is flattened into dotted field names
//! (`labels.hd_Price`), renamed to a short lowercase form (`price`) and
//! projected onto [`ALLOWED_FIELDS`].

use serde_json::{Map, Value};

use crate::models::{has_price, Fields};
use crate::utils::error::{AppError, Result};

/// Prefix shared by the tracking labels in the variant payload.
pub const FIELD_PREFIX: &str = "labels.hd_";

pub const ALLOWED_FIELDS: [&str; 6] = [
    "discount",
    "availability",
    "price",
    "stock",
    "color",
    "retailer",
];

pub fn parse_payload(text: &str) -> Result<Value> {
    serde_json::from_str(text.trim())
        .map_err(|e| AppError::parse(format!("invalid variant payload: {}", e)))
}

/// Flatten nested objects into dotted keys. Arrays and scalars are leaves.
pub fn flatten(value: &Value) -> Fields {
    let mut out = Fields::new();
    if let Value::Object(map) = value {
        flatten_into("", map, &mut out);
    }
    out
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, out: &mut Fields) {
    for (key, value) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Object(nested) => flatten_into(&name, nested, out),
            leaf => {
                out.insert(name, leaf.clone());
            }
        }
    }
}

pub fn normalize_field_name(name: &str) -> String {
    name.strip_prefix(FIELD_PREFIX).unwrap_or(name).to_lowercase()
}

/// Rename flattened fields and keep only the allow-listed ones.
///
/// A prefixed label wins over a bare top-level key of the same name.
pub fn project(flat: Fields) -> Fields {
    let mut row = Fields::new();
    for (name, value) in flat {
        let field = normalize_field_name(&name);
        if !ALLOWED_FIELDS.contains(&field.as_str()) {
            continue;
        }

        if name.starts_with(FIELD_PREFIX) {
            row.insert(field, value);
        } else {
            row.entry(field).or_insert(value);
        }
    }
    row
}

/// Split a payload into its variants.
///
/// Accepted shapes: an array of variants, an object keyed by variation id, or
/// a single variant object. In a keyed object only the entries under numeric
/// variation ids are variants; scalar siblings such as `"selected"` are
/// ignored.
fn variants(payload: &Value) -> Result<Vec<&Value>> {
    match payload {
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(map) => Ok(keyed_variants(map).unwrap_or_else(|| vec![payload])),
        other => Err(AppError::parse(format!(
            "expected variant object or array, found {}",
            json_kind(other)
        ))),
    }
}

/// Variants of an object keyed by variation id, or `None` for a single variant.
fn keyed_variants(map: &Map<String, Value>) -> Option<Vec<&Value>> {
    if map.contains_key("labels") {
        return None;
    }

    let nested: Vec<(&String, &Value)> = map.iter().filter(|(_, v)| v.is_object()).collect();
    if nested.is_empty() || !nested.iter().all(|(key, _)| is_variation_id(key)) {
        return None;
    }
    Some(nested.into_iter().map(|(_, v)| v).collect())
}

fn is_variation_id(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Turn a parsed payload into priced rows, in payload order.
pub fn normalize_variants(payload: &Value) -> Result<Vec<Fields>> {
    let rows = variants(payload)?
        .into_iter()
        .map(|variant| project(flatten(variant)))
        .filter(has_price)
        .collect();
    Ok(rows)
}
