use ppltrace_core::config::{FieldPath, SchemaMappings};
use ppltrace_core::time::{
    canonical_time_string, has_nanosecond_precision_str, timestamp_str_to_nanos,
};
use serde_json::{Map, Value};

use crate::row::RowView;

/// A span-shaped JSON object is itself a row: field name lookup is plain key
/// access. Lets the hits-passthrough path reuse every resolver unchanged.
impl RowView for Value {
    fn get(&self, name: &str) -> Option<&Value> {
        Value::get(self, name)
    }
}

fn resolve_path<'a>(row: &'a dyn RowView, path: &FieldPath) -> Option<&'a Value> {
    let value = row.get(path.field())?;
    path.lookup_rest(value)
}

/// First non-empty string the chain yields, or empty.
fn resolve_string_chain(row: &dyn RowView, chain: &[FieldPath]) -> String {
    for path in chain {
        if let Some(value) = resolve_path(row, path) {
            if let Some(s) = value.as_str() {
                if !s.is_empty() {
                    return s.to_string();
                }
            }
        }
    }
    String::new()
}

/// Canonical string of the first non-null value the chain yields, or empty.
fn resolve_time_chain(row: &dyn RowView, chain: &[FieldPath]) -> String {
    for path in chain {
        if let Some(value) = resolve_path(row, path) {
            if !value.is_null() {
                return canonical_time_string(value);
            }
        }
    }
    String::new()
}

pub fn resolve_service_name(row: &dyn RowView, mappings: &SchemaMappings) -> String {
    resolve_string_chain(row, &mappings.service_name)
}

/// Service name for a pre-shaped span object; additionally falls back to the
/// operation name at the end of the chain.
pub fn resolve_span_service_name(span: &Value, mappings: &SchemaMappings) -> String {
    if !span.is_object() {
        return String::new();
    }
    resolve_string_chain(span, &mappings.span_service_name)
}

pub fn resolve_start_time(row: &dyn RowView, mappings: &SchemaMappings) -> String {
    resolve_time_chain(row, &mappings.start_time)
}

pub fn resolve_end_time(row: &dyn RowView, mappings: &SchemaMappings) -> String {
    resolve_time_chain(row, &mappings.end_time)
}

/// `@timestamp` compatibility value: prefers the end-time epoch field the new
/// schema writes, then the literal `@timestamp` column.
pub fn resolve_timestamp(row: &dyn RowView, mappings: &SchemaMappings) -> String {
    resolve_time_chain(row, &mappings.timestamp)
}

/// `time` compatibility value, same preference as [`resolve_timestamp`].
pub fn resolve_time(row: &dyn RowView, mappings: &SchemaMappings) -> String {
    resolve_time_chain(row, &mappings.time)
}

/// Duration in nanoseconds. Nanosecond-precision timestamps are authoritative
/// when both ends carry them; explicit duration fields beat recomputing from
/// millisecond-precision timestamps; 0 when nothing resolves.
pub fn resolve_duration(
    row: &dyn RowView,
    mappings: &SchemaMappings,
    start_time: &str,
    end_time: &str,
) -> i64 {
    if has_nanosecond_precision_str(start_time) && has_nanosecond_precision_str(end_time) {
        let start = timestamp_str_to_nanos(start_time);
        let end = timestamp_str_to_nanos(end_time);
        if start > 0 && end > 0 {
            return end - start;
        }
    }

    for path in &mappings.duration {
        if let Some(value) = resolve_path(row, path) {
            if let Some(n) = value.as_i64() {
                return n;
            }
            if let Some(f) = value.as_f64() {
                return f as i64;
            }
            if let Some(n) = value.as_str().and_then(|s| s.parse::<i64>().ok()) {
                return n;
            }
        }
    }

    let start = timestamp_str_to_nanos(start_time);
    let end = timestamp_str_to_nanos(end_time);
    if start > 0 && end > 0 {
        return end - start;
    }
    0
}

/// Instrumentation scope under any of its aliases, verbatim; empty object
/// when absent.
pub fn resolve_scope(row: &dyn RowView, mappings: &SchemaMappings) -> Value {
    for path in &mappings.scope {
        if let Some(value) = resolve_path(row, path) {
            if !value.is_null() {
                return value.clone();
            }
        }
    }
    Value::Object(Map::new())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn mappings() -> SchemaMappings {
        SchemaMappings::default()
    }

    #[test]
    fn service_name_prefers_resource_attributes() {
        let row = json!({
            "resource": {"attributes": {"service": {"name": "primary-service"}}},
            "attributes": {"aws": {"local": {"service": "fallback-service"}}},
            "serviceName": "legacy-service",
        });
        assert_eq!(resolve_service_name(&row, &mappings()), "primary-service");
    }

    #[test]
    fn service_name_falls_back_to_aws_local_service() {
        let row = json!({
            "resource": {},
            "attributes": {"aws": {"local": {"service": "fallback-service"}}},
            "serviceName": "legacy-service",
        });
        assert_eq!(resolve_service_name(&row, &mappings()), "fallback-service");
    }

    #[test]
    fn service_name_falls_back_to_legacy_field() {
        let row = json!({
            "resource": {},
            "attributes": {},
            "serviceName": "legacy-service",
        });
        assert_eq!(resolve_service_name(&row, &mappings()), "legacy-service");
    }

    #[test]
    fn service_name_defaults_to_empty() {
        assert_eq!(resolve_service_name(&json!({}), &mappings()), "");
        assert_eq!(
            resolve_service_name(&json!({"resource": {}, "attributes": {}}), &mappings()),
            ""
        );
    }

    #[test]
    fn span_service_name_handles_dotted_keys_and_name_fallback() {
        let dotted = json!({
            "resource": {"attributes": {"service.name": "alt-primary"}},
            "serviceName": "legacy",
        });
        assert_eq!(resolve_span_service_name(&dotted, &mappings()), "alt-primary");

        let dotted_aws = json!({
            "resource": {"attributes": {}},
            "attributes": {"aws.local.service": "alt-fallback"},
        });
        assert_eq!(resolve_span_service_name(&dotted_aws, &mappings()), "alt-fallback");

        let name_only = json!({"name": "span-name"});
        assert_eq!(resolve_span_service_name(&name_only, &mappings()), "span-name");

        assert_eq!(resolve_span_service_name(&Value::Null, &mappings()), "");
        assert_eq!(resolve_span_service_name(&json!({}), &mappings()), "");
    }

    #[test]
    fn start_time_prefers_unix_nano_field() {
        let row = json!({
            "startTimeUnixNano": "1672574400000000000",
            "startTime": "2023-01-01T10:00:00.000Z",
        });
        assert_eq!(resolve_start_time(&row, &mappings()), "1672574400000000000");

        let legacy = json!({"startTime": "2023-01-01T10:00:00.000Z"});
        assert_eq!(resolve_start_time(&legacy, &mappings()), "2023-01-01T10:00:00.000Z");

        assert_eq!(resolve_start_time(&json!({}), &mappings()), "");
    }

    #[test]
    fn end_time_prefers_unix_nano_field() {
        let row = json!({
            "endTimeUnixNano": "1672574400100000000",
            "endTime": "2023-01-01T10:00:00.100Z",
        });
        assert_eq!(resolve_end_time(&row, &mappings()), "1672574400100000000");
    }

    #[test]
    fn timestamp_and_time_compat_prefer_end_nano() {
        let row = json!({
            "endTimeUnixNano": "1672574400100000000",
            "@timestamp": "2023-01-01T10:00:00.100Z",
            "time": "2023-01-01T10:00:00.100Z",
        });
        assert_eq!(resolve_timestamp(&row, &mappings()), "1672574400100000000");
        assert_eq!(resolve_time(&row, &mappings()), "1672574400100000000");

        let legacy = json!({"@timestamp": "2023-01-01T10:00:00.100Z"});
        assert_eq!(resolve_timestamp(&legacy, &mappings()), "2023-01-01T10:00:00.100Z");
    }

    #[test]
    fn numeric_time_values_render_as_strings() {
        let row = json!({"startTimeUnixNano": 1672574400000000000_i64});
        assert_eq!(resolve_start_time(&row, &mappings()), "1672574400000000000");
    }

    #[test]
    fn duration_from_high_precision_timestamps() {
        let row = json!({});
        let result = resolve_duration(
            &row,
            &mappings(),
            "1672574400000000000",
            "1672574400100000000",
        );
        assert_eq!(result, 100_000_000);
    }

    #[test]
    fn duration_fields_beat_low_precision_timestamps() {
        let row = json!({"durationNano": 50000000, "durationInNanos": 60000000});
        let result = resolve_duration(
            &row,
            &mappings(),
            "2023-01-01T10:00:00.000Z",
            "2023-01-01T10:00:00.100Z",
        );
        assert_eq!(result, 50_000_000);
    }

    #[test]
    fn duration_in_nanos_is_second_choice() {
        let row = json!({"durationInNanos": 75000000});
        let result = resolve_duration(
            &row,
            &mappings(),
            "2023-01-01T10:00:00.000Z",
            "2023-01-01T10:00:00.100Z",
        );
        assert_eq!(result, 75_000_000);
    }

    #[test]
    fn duration_recomputed_from_low_precision_when_no_fields() {
        let row = json!({});
        let result = resolve_duration(
            &row,
            &mappings(),
            "2023-01-01T10:00:00.000Z",
            "2023-01-01T10:00:00.100Z",
        );
        assert_eq!(result, 100_000_000);
    }

    #[test]
    fn duration_zero_when_nothing_resolves() {
        assert_eq!(resolve_duration(&json!({}), &mappings(), "", ""), 0);
    }

    #[test]
    fn duration_falls_back_to_fields_on_unparsable_timestamps() {
        let row = json!({"durationNano": 50000000});
        assert_eq!(
            resolve_duration(&row, &mappings(), "invalid", "invalid"),
            50_000_000
        );
    }

    #[test]
    fn scope_prefers_new_alias() {
        let row = json!({
            "scope": {"name": "test-scope", "version": "1.0"},
            "instrumentationScope": {"name": "legacy-scope"},
        });
        assert_eq!(
            resolve_scope(&row, &mappings()),
            json!({"name": "test-scope", "version": "1.0"})
        );

        let legacy = json!({"instrumentationScope": {"name": "legacy-scope"}});
        assert_eq!(resolve_scope(&legacy, &mappings()), json!({"name": "legacy-scope"}));

        assert_eq!(resolve_scope(&json!({}), &mappings()), json!({}));
    }

    #[test]
    fn overridden_chain_changes_resolution() {
        let mut custom = SchemaMappings::default();
        custom.service_name = vec![FieldPath::parse("process.serviceName").unwrap()];
        let row = json!({
            "process": {"serviceName": "jaeger-style"},
            "serviceName": "ignored",
        });
        assert_eq!(resolve_service_name(&row, &custom), "jaeger-style");
    }
}
