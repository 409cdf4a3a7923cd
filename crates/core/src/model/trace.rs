use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One span, denormalized for display. Serialized with the camelCase field
/// names downstream consumers expect from the wire schemas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TraceHit {
    pub trace_id: String,
    pub span_id: String,
    /// Empty string marks a root span.
    pub parent_span_id: String,
    pub service_name: String,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    /// Log-compatibility alias of the end time, so span hits can be listed
    /// alongside log records by the same timestamp column.
    #[serde(rename = "@timestamp")]
    pub timestamp: String,
    pub time: String,
    pub duration_in_nanos: i64,
    pub status: SpanStatus,
    #[serde(default)]
    pub attributes: Value,
    #[serde(default)]
    pub resource: Value,
    #[serde(default)]
    pub instrumentation_scope: Value,
    /// One-element array holding the start time as nanoseconds since epoch,
    /// 0 when the start time was unparsable. Normalizer output is sorted
    /// ascending by this value.
    pub sort: [i64; 1],
}

impl TraceHit {
    pub fn is_root(&self) -> bool {
        self.parent_span_id.is_empty()
    }

    pub fn sort_key(&self) -> i64 {
        self.sort[0]
    }

    pub fn duration_ms(&self) -> i64 {
        self.duration_in_nanos / 1_000_000
    }
}

/// Span status per the OTel convention: 0 unset, 1 ok, 2 error. Extraction is
/// tolerant of every shape the source schemas produce and never fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SpanStatus {
    pub code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SpanStatus {
    pub const UNSET: i64 = 0;
    pub const OK: i64 = 1;
    pub const ERROR: i64 = 2;

    pub fn extract(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return Self::default();
        };
        match value {
            Value::Number(n) => Self {
                code: n.as_i64().unwrap_or(Self::UNSET),
                message: None,
            },
            Value::String(s) => Self {
                code: Self::code_from_str(s),
                message: None,
            },
            Value::Object(obj) => {
                let code = match obj.get("code") {
                    Some(Value::Number(n)) => n.as_i64().unwrap_or(Self::UNSET),
                    Some(Value::String(s)) => Self::code_from_str(s),
                    _ => match obj.get("status_code") {
                        Some(Value::Number(n)) => n.as_i64().unwrap_or(Self::UNSET),
                        _ => Self::UNSET,
                    },
                };
                let message = obj
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string);
                Self { code, message }
            }
            _ => Self::default(),
        }
    }

    fn code_from_str(input: &str) -> i64 {
        match input.to_ascii_uppercase().as_str() {
            "UNSET" => Self::UNSET,
            "OK" => Self::OK,
            "ERROR" => Self::ERROR,
            _ => Self::UNSET,
        }
    }

    pub fn is_error(&self) -> bool {
        self.code == Self::ERROR
    }
}
