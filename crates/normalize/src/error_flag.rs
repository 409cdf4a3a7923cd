use ppltrace_core::model::trace::{SpanStatus, TraceHit};
use serde_json::Value;

/// Known locations for an HTTP status code across the span schemas, nested
/// and flattened.
const HTTP_STATUS_PATHS: [&[&str]; 6] = [
    &["attributes", "http", "status_code"],
    &["attributes", "http", "response", "status_code"],
    &["attributes", "http.status_code"],
    &["attributes.http.status_code"],
    &["http.status_code"],
    &["statusCode"],
];

/// Whether a raw span object represents a failed operation: explicit error
/// status under any of its spellings, or a 4xx/5xx HTTP status code.
pub fn is_span_error(span: &Value) -> bool {
    let Some(obj) = span.as_object() else {
        return false;
    };

    if let Some(flat) = obj.get("status.code") {
        if SpanStatus::extract(Some(flat)).is_error() {
            return true;
        }
    }
    if let Some(status) = obj.get("status") {
        if SpanStatus::extract(Some(status)).is_error() {
            return true;
        }
    }

    HTTP_STATUS_PATHS.iter().any(|path| {
        walk(span, path)
            .and_then(numeric_status)
            .is_some_and(|code| code >= 400)
    })
}

/// Error flag for an already normalized hit: extracted status plus the HTTP
/// heuristics over the verbatim attributes.
pub fn hit_has_error(hit: &TraceHit) -> bool {
    if hit.status.is_error() {
        return true;
    }
    HTTP_STATUS_PATHS
        .iter()
        .filter_map(|path| match *path {
            ["attributes", rest @ ..] => walk_segments(&hit.attributes, rest),
            _ => None,
        })
        .filter_map(numeric_status)
        .any(|code| code >= 400)
}

fn walk<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = root;
    for segment in path {
        current = current.get(segment)?;
    }
    Some(current)
}

fn walk_segments<'a>(root: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    if segments.is_empty() {
        return None;
    }
    walk(root, segments)
}

fn numeric_status(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn detects_flat_status_code() {
        assert!(is_span_error(&json!({"status.code": 2})));
        assert!(!is_span_error(&json!({"status.code": 1})));
        assert!(!is_span_error(&json!({"status.code": 0})));
    }

    #[test]
    fn detects_nested_status_object() {
        assert!(is_span_error(&json!({"status": {"code": 2}})));
        assert!(is_span_error(&json!({"status": {"code": "ERROR"}})));
        assert!(!is_span_error(&json!({"status": {"code": "OK"}})));
    }

    #[test]
    fn detects_http_4xx_and_5xx() {
        assert!(is_span_error(&json!({"attributes": {"http": {"status_code": 404}}})));
        assert!(is_span_error(&json!({"attributes": {"http": {"status_code": 500}}})));
        assert!(!is_span_error(&json!({"attributes": {"http": {"status_code": 200}}})));
        assert!(!is_span_error(&json!({"attributes": {"http": {"status_code": 301}}})));
    }

    #[test]
    fn detects_alternative_http_locations() {
        assert!(is_span_error(&json!({"attributes.http.status_code": 404})));
        assert!(is_span_error(&json!({"attributes": {"http.status_code": 500}})));
        assert!(is_span_error(
            &json!({"attributes": {"http": {"response": {"status_code": 400}}}})
        ));
        assert!(is_span_error(&json!({"http.status_code": 503})));
        assert!(is_span_error(&json!({"statusCode": 422})));
    }

    #[test]
    fn non_objects_are_not_errors() {
        assert!(!is_span_error(&Value::Null));
        assert!(!is_span_error(&json!("nope")));
        assert!(!is_span_error(&json!({})));
        assert!(!is_span_error(&json!({"name": "test-span"})));
    }

    #[test]
    fn hit_error_flag_uses_status_and_attributes() {
        let mut hit = base_hit();
        assert!(!hit_has_error(&hit));

        hit.status = SpanStatus { code: 2, message: None };
        assert!(hit_has_error(&hit));

        hit.status = SpanStatus::default();
        hit.attributes = json!({"http": {"status_code": 502}});
        assert!(hit_has_error(&hit));

        hit.attributes = json!({"http.status_code": 404});
        assert!(hit_has_error(&hit));

        hit.attributes = json!({"http": {"status_code": 200}});
        assert!(!hit_has_error(&hit));
    }

    fn base_hit() -> TraceHit {
        TraceHit {
            trace_id: "t1".into(),
            span_id: "s1".into(),
            parent_span_id: String::new(),
            service_name: "api".into(),
            name: "GET /".into(),
            start_time: String::new(),
            end_time: String::new(),
            timestamp: String::new(),
            time: String::new(),
            duration_in_nanos: 0,
            status: SpanStatus::default(),
            attributes: Value::Null,
            resource: Value::Null,
            instrumentation_scope: Value::Null,
            sort: [0],
        }
    }
}
