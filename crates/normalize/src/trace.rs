use ppltrace_core::config::SchemaMappings;
use ppltrace_core::error::{NormalizeError, Result};
use ppltrace_core::model::trace::{SpanStatus, TraceHit};
use ppltrace_core::time::timestamp_str_to_nanos;
use serde_json::Value;
use tracing::warn;

use crate::resolve::{
    resolve_duration, resolve_end_time, resolve_scope, resolve_service_name,
    resolve_span_service_name, resolve_start_time, resolve_time, resolve_timestamp,
};
use crate::row::{ColumnarTable, RowView, SchemaIndex};
use crate::shape::{self, ResponseShape};

/// Normalize a raw PPL/JDBC trace query response into display-ready hits,
/// sorted ascending by start time. Malformed rows are skipped with a warning;
/// only a total structural mismatch yields an empty list, and nothing ever
/// propagates an error to the caller.
pub fn normalize_trace_response(response: &Value, mappings: &SchemaMappings) -> Vec<TraceHit> {
    if response.is_null() {
        return Vec::new();
    }

    let Some(response_shape) = shape::detect(response) else {
        warn!("unrecognized trace response shape, returning no hits");
        return Vec::new();
    };

    let mut hits = match response_shape {
        ResponseShape::Fields { fields, size } => {
            if size == 0 {
                warn!("trace response has no rows");
                return Vec::new();
            }
            let table = ColumnarTable::new(&fields);
            let mut out = Vec::with_capacity(size);
            for index in 0..size {
                match build_hit(&table.row(index), mappings) {
                    Ok(hit) => out.push(hit),
                    Err(e) => warn!("skipping malformed row {index}: {e}"),
                }
            }
            out
        }
        ResponseShape::Datarows { schema, datarows } => {
            let schema_index = SchemaIndex::new(&schema);
            let mut out = Vec::with_capacity(datarows.len());
            for (index, row) in datarows.iter().enumerate() {
                let built = row
                    .as_array()
                    .ok_or_else(|| NormalizeError::Row("row is not an array".to_string()))
                    .and_then(|cells| build_hit(&schema_index.row(cells), mappings));
                match built {
                    Ok(hit) => out.push(hit),
                    Err(e) => warn!("skipping malformed row {index}: {e}"),
                }
            }
            out
        }
        ResponseShape::Hits { hits } => {
            let mut out = Vec::with_capacity(hits.len());
            for (index, hit) in hits.iter().enumerate() {
                let source = hit.get("_source").unwrap_or(hit);
                match build_span_hit(source, mappings) {
                    Ok(hit) => out.push(hit),
                    Err(e) => warn!("skipping malformed hit {index}: {e}"),
                }
            }
            out
        }
    };

    hits.sort_by_key(TraceHit::sort_key);
    hits
}

fn build_hit(row: &dyn RowView, mappings: &SchemaMappings) -> Result<TraceHit> {
    let span_id = row
        .get("spanId")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| NormalizeError::Row("missing spanId".to_string()))?
        .to_string();

    let start_time = resolve_start_time(row, mappings);
    let end_time = resolve_end_time(row, mappings);
    let duration_in_nanos = resolve_duration(row, mappings, &start_time, &end_time);
    let sort = timestamp_str_to_nanos(&start_time);

    // sparse exports flatten the status object into a status.code column
    let status = match row.get("status") {
        Some(value) => SpanStatus::extract(Some(value)),
        None => SpanStatus::extract(row.get("status.code")),
    };

    Ok(TraceHit {
        trace_id: string_field(row, "traceId"),
        span_id,
        parent_span_id: string_field(row, "parentSpanId"),
        service_name: resolve_service_name(row, mappings),
        name: string_field(row, "name"),
        start_time,
        end_time,
        timestamp: resolve_timestamp(row, mappings),
        time: resolve_time(row, mappings),
        duration_in_nanos,
        status,
        attributes: cloned_field(row, "attributes"),
        resource: cloned_field(row, "resource"),
        instrumentation_scope: resolve_scope(row, mappings),
        sort: [sort],
    })
}

fn build_span_hit(span: &Value, mappings: &SchemaMappings) -> Result<TraceHit> {
    if !span.is_object() {
        return Err(NormalizeError::Row("hit is not an object".to_string()));
    }
    let mut hit = build_hit(span, mappings)?;
    if hit.service_name.is_empty() {
        // pre-shaped spans additionally fall back to the operation name
        hit.service_name = resolve_span_service_name(span, mappings);
    }
    Ok(hit)
}

fn string_field(row: &dyn RowView, name: &str) -> String {
    row.get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn cloned_field(row: &dyn RowView, name: &str) -> Value {
    row.get(name).cloned().unwrap_or(Value::Null)
}
