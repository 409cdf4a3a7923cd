use ppltrace_core::model::log::{LogHit, TIMESTAMP_FIELD};
use serde_json::{Map, Value};

use crate::shape::{self, ResponseShape};

const TIMESTAMP_FALLBACKS: [&str; 3] = [TIMESTAMP_FIELD, "time", "observedTimestamp"];

/// Normalize a raw PPL/JDBC log query response. Every named field is copied
/// verbatim; `@timestamp` is rewritten to the first non-null timestamp alias
/// and severity fields are duplicated under their dotted aliases. No sorting
/// is applied (the caller sorts and paginates). Malformed shapes yield an
/// empty list silently.
pub fn normalize_log_response(response: &Value) -> Vec<LogHit> {
    let Some(response_shape) = shape::detect(response) else {
        return Vec::new();
    };

    match response_shape {
        ResponseShape::Fields { fields, size } => {
            if fields.is_empty() || size == 0 {
                return Vec::new();
            }
            (0..size)
                .map(|index| {
                    let mut record = Map::new();
                    for (name, values) in &fields {
                        if let Some(value) = values.get(index) {
                            record.insert((*name).to_string(), value.clone());
                        }
                    }
                    finish_record(record)
                })
                .collect()
        }
        ResponseShape::Datarows { schema, datarows } => {
            datarows
                .iter()
                .filter_map(Value::as_array)
                .map(|cells| {
                    let mut record = Map::new();
                    for (index, name) in schema.iter().enumerate() {
                        if name.is_empty() {
                            continue;
                        }
                        if let Some(value) = cells.get(index) {
                            record.insert((*name).to_string(), value.clone());
                        }
                    }
                    finish_record(record)
                })
                .collect()
        }
        ResponseShape::Hits { hits } => hits
            .iter()
            .filter_map(|hit| {
                let source = hit.get("_source").unwrap_or(hit);
                source.as_object().cloned().map(LogHit::new)
            })
            .collect(),
    }
}

fn finish_record(mut record: Map<String, Value>) -> LogHit {
    let timestamp = TIMESTAMP_FALLBACKS
        .iter()
        .filter_map(|name| record.get(*name))
        .find(|v| !v.is_null())
        .cloned();
    if let Some(timestamp) = timestamp {
        record.insert(TIMESTAMP_FIELD.to_string(), timestamp);
    }

    let severity_text = record.get("severityText").filter(|v| !v.is_null()).cloned();
    if let Some(text) = severity_text {
        record.insert("severity.text".to_string(), text);
    }
    let severity_number = record
        .get("severityNumber")
        .filter(|v| !v.is_null())
        .cloned();
    if let Some(number) = severity_number {
        record.insert("severity.number".to_string(), number);
    }

    LogHit::new(record)
}
