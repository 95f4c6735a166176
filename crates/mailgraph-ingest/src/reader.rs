//! Ingestion input: parse and validate a JSON array of email records.
//!
//! The canonical schema is `sender`, `receiver`, `subject`, `timestamp`.
//! Records using the older `from`/`to` names are rejected rather than
//! mapped, so a batch never mixes two schemas silently.

use std::path::Path;

use serde_json::{Map, Value};

use mailgraph_core::{EmailRecord, Timestamp};

use crate::error::{IngestError, Result};

/// Legacy field names and the canonical field that replaced each.
const LEGACY_FIELDS: &[(&str, &str)] = &[("from", "sender"), ("to", "receiver")];

/// Read and validate a batch from a file.
pub fn read_batch(path: &Path) -> Result<Vec<EmailRecord>> {
    let raw = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_batch(&raw)
}

/// Parse and validate a whole batch. Every record is checked before the
/// caller gets anything back, so an invalid record means no writes at all.
pub fn parse_batch(raw: &str) -> Result<Vec<EmailRecord>> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| IngestError::Parse(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(IngestError::Parse(format!(
                "expected a top-level array, found {}",
                type_name(&other)
            )))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            parse_record(item).map_err(|reason| IngestError::InvalidRecord { index, reason })
        })
        .collect()
}

fn parse_record(item: &Value) -> std::result::Result<EmailRecord, String> {
    let obj = item
        .as_object()
        .ok_or_else(|| format!("expected an object, found {}", type_name(item)))?;

    Ok(EmailRecord {
        sender: address(obj, "sender")?,
        receiver: address(obj, "receiver")?,
        subject: string_field(obj, "subject")?,
        timestamp: timestamp_field(obj)?,
    })
}

/// A required, non-blank email address, kept exactly as given.
fn address(obj: &Map<String, Value>, field: &str) -> std::result::Result<String, String> {
    let value = string_field(obj, field)?;
    if value.trim().is_empty() {
        return Err(format!("field `{field}` is empty"));
    }
    Ok(value)
}

fn string_field(obj: &Map<String, Value>, field: &str) -> std::result::Result<String, String> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(format!(
            "field `{field}` must be a string, found {}",
            type_name(other)
        )),
        None => Err(missing(obj, field)),
    }
}

fn timestamp_field(obj: &Map<String, Value>) -> std::result::Result<Timestamp, String> {
    match obj.get("timestamp") {
        Some(Value::String(s)) => Ok(Timestamp::Text(s.clone())),
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_i64() {
                Ok(Timestamp::Integer(v))
            } else if n.is_f64() {
                n.as_f64()
                    .map(Timestamp::Float)
                    .ok_or_else(|| format!("field `timestamp`: unsupported number {n}"))
            } else {
                // Integers beyond i64 would lose precision as a float.
                Err(format!("field `timestamp`: integer {n} is out of range"))
            }
        }
        Some(other) => Err(format!(
            "field `timestamp` must be a string or number, found {}",
            type_name(other)
        )),
        None => Err(missing(obj, "timestamp")),
    }
}

fn missing(obj: &Map<String, Value>, field: &str) -> String {
    for (legacy, canonical) in LEGACY_FIELDS {
        if *canonical == field && obj.contains_key(*legacy) {
            return format!("missing field `{field}` (record uses legacy field `{legacy}`)");
        }
    }
    format!("missing field `{field}`")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
