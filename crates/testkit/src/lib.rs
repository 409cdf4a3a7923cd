use serde_json::{Value, json};

/// A two-span trace in the columnar fields format. Encodes the same logical
/// rows as [`datarows_trace_response`] so format-equivalence tests can
/// compare outputs directly.
pub fn fields_trace_response() -> Value {
    json!({
        "fields": [
            {"name": "traceId", "values": ["t1", "t1"]},
            {"name": "spanId", "values": ["root", "child"]},
            {"name": "parentSpanId", "values": ["", "root"]},
            {"name": "name", "values": ["GET /v1/orders", "cache.get redis"]},
            {"name": "serviceName", "values": ["api", "cache"]},
            {"name": "startTime", "values": ["2026-02-01T00:00:00.000Z", "2026-02-01T00:00:00.900Z"]},
            {"name": "endTime", "values": ["2026-02-01T00:00:01.800Z", "2026-02-01T00:00:01.600Z"]},
            {"name": "durationInNanos", "values": [1800000000_i64, 700000000_i64]},
            {"name": "status", "values": [{"code": 2, "message": "upstream timeout"}, {"code": 0}]},
        ],
        "size": 2,
    })
}

/// The same two spans in the row-oriented datarows format.
pub fn datarows_trace_response() -> Value {
    json!({
        "schema": [
            {"name": "traceId"},
            {"name": "spanId"},
            {"name": "parentSpanId"},
            {"name": "name"},
            {"name": "serviceName"},
            {"name": "startTime"},
            {"name": "endTime"},
            {"name": "durationInNanos"},
            {"name": "status"},
        ],
        "datarows": [
            [
                "t1", "root", "", "GET /v1/orders", "api",
                "2026-02-01T00:00:00.000Z", "2026-02-01T00:00:01.800Z",
                1800000000_i64, {"code": 2, "message": "upstream timeout"}
            ],
            [
                "t1", "child", "root", "cache.get redis", "cache",
                "2026-02-01T00:00:00.900Z", "2026-02-01T00:00:01.600Z",
                700000000_i64, {"code": 0}
            ],
        ],
    })
}

/// Pre-shaped hits passthrough: one span with OTel resource attributes, one
/// with nothing but an operation name.
pub fn hits_trace_response() -> Value {
    json!({
        "hits": {"hits": [
            {"_source": {
                "traceId": "t2",
                "spanId": "s1",
                "parentSpanId": "",
                "name": "POST /checkout",
                "resource": {"attributes": {"service": {"name": "checkout"}}},
                "startTime": "2026-02-01T00:00:02.000Z",
                "endTime": "2026-02-01T00:00:02.500Z",
            }},
            {"_source": {
                "traceId": "t2",
                "spanId": "s2",
                "parentSpanId": "s1",
                "name": "SELECT orders",
                "startTime": "2026-02-01T00:00:02.100Z",
                "endTime": "2026-02-01T00:00:02.300Z",
            }},
        ]},
    })
}

/// Two correlated log records in the fields format, mirroring
/// [`datarows_log_response`].
pub fn fields_log_response() -> Value {
    json!({
        "fields": [
            {"name": "traceId", "values": ["t1", "t1"]},
            {"name": "spanId", "values": ["child", "child"]},
            {"name": "body", "values": ["retrying attempt=2", "context deadline exceeded"]},
            {"name": "severityText", "values": ["WARN", "ERROR"]},
            {"name": "severityNumber", "values": [13, 17]},
            {"name": "time", "values": ["2026-02-01T00:00:00.950Z", "2026-02-01T00:00:01.200Z"]},
        ],
        "size": 2,
    })
}

/// The same log records in the datarows format.
pub fn datarows_log_response() -> Value {
    json!({
        "schema": [
            {"name": "traceId"},
            {"name": "spanId"},
            {"name": "body"},
            {"name": "severityText"},
            {"name": "severityNumber"},
            {"name": "time"},
        ],
        "datarows": [
            ["t1", "child", "retrying attempt=2", "WARN", 13, "2026-02-01T00:00:00.950Z"],
            ["t1", "child", "context deadline exceeded", "ERROR", 17, "2026-02-01T00:00:01.200Z"],
        ],
    })
}
