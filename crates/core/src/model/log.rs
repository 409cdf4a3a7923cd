use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const TIMESTAMP_FIELD: &str = "@timestamp";

/// One log record, all named fields carried verbatim. `@timestamp` is
/// normalized by the log transform to the first non-null of `@timestamp`,
/// `time`, `observedTimestamp`; severity fields are duplicated under the
/// dotted aliases `severity.text` / `severity.number` for consumers keyed on
/// either form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct LogHit(pub Map<String, Value>);

impl LogHit {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.0.get(TIMESTAMP_FIELD).and_then(Value::as_str)
    }

    pub fn severity_text(&self) -> Option<&str> {
        self.0.get("severity.text").and_then(Value::as_str)
    }

    pub fn severity_number(&self) -> Option<i64> {
        self.0.get("severity.number").and_then(Value::as_i64)
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.0.get("traceId").and_then(Value::as_str)
    }

    pub fn span_id(&self) -> Option<&str> {
        self.0.get("spanId").and_then(Value::as_str)
    }

    pub fn body(&self) -> Option<&str> {
        self.0
            .get("body")
            .or_else(|| self.0.get("message"))
            .and_then(Value::as_str)
    }
}
