use chrono::DateTime;
use serde_json::Value;
use tracing::warn;

/// Threshold above which a bare numeric timestamp is taken as epoch
/// nanoseconds rather than epoch milliseconds.
const NANOS_MAGNITUDE: f64 = 1e14;

/// Digit count at which an all-digit timestamp string is taken as epoch
/// nanoseconds. 13 digits is a current epoch-millis value; 15 or more only
/// occurs for micro/nanosecond epochs.
const NANOS_DIGITS: usize = 15;

/// Whether a raw timestamp value carries sub-millisecond precision that a
/// round-trip through epoch milliseconds would destroy.
pub fn has_nanosecond_precision_str(input: &str) -> bool {
    if input.is_empty() {
        return false;
    }
    if input.bytes().all(|b| b.is_ascii_digit()) {
        return input.len() >= NANOS_DIGITS;
    }
    if let Some(dot) = input.find('.') {
        let fractional = input[dot + 1..]
            .bytes()
            .take_while(|b| b.is_ascii_digit())
            .count();
        return fractional > 3;
    }
    false
}

pub fn has_nanosecond_precision(value: &Value) -> bool {
    match value {
        Value::String(s) => has_nanosecond_precision_str(s),
        Value::Number(n) => n.as_f64().unwrap_or(0.0) >= NANOS_MAGNITUDE,
        _ => false,
    }
}

/// Convert a resolved timestamp string to nanoseconds since epoch. Accepts
/// all-digit epoch values (millis or nanos by magnitude) and RFC3339 strings.
/// Unparsable input yields 0 with a logged warning.
pub fn timestamp_str_to_nanos(input: &str) -> i64 {
    if input.is_empty() {
        return 0;
    }
    if input.bytes().all(|b| b.is_ascii_digit()) {
        return match input.parse::<i64>() {
            Ok(n) if input.len() >= NANOS_DIGITS => n,
            Ok(n) => n.saturating_mul(1_000_000),
            Err(e) => {
                warn!("error converting timestamp to nanos: {input}: {e}");
                0
            }
        };
    }
    match DateTime::parse_from_rfc3339(input) {
        Ok(ts) => ts.timestamp_nanos_opt().unwrap_or(0),
        Err(e) => {
            warn!("error converting timestamp to nanos: {input}: {e}");
            0
        }
    }
}

/// Convert a raw timestamp value (string, epoch number, anything else) to
/// nanoseconds since epoch, 0 on failure.
pub fn convert_timestamp_to_nanos(value: &Value) -> i64 {
    match value {
        Value::Null => 0,
        Value::String(s) => timestamp_str_to_nanos(s),
        Value::Number(n) => {
            let raw = n.as_f64().unwrap_or(0.0);
            if raw <= 0.0 {
                0
            } else if raw >= NANOS_MAGNITUDE {
                n.as_i64().unwrap_or(raw as i64)
            } else {
                (raw * 1e6) as i64
            }
        }
        other => {
            warn!("error converting timestamp to nanos: unsupported value {other}");
            0
        }
    }
}

/// Canonical string form of a raw timestamp value. Strings pass through
/// verbatim, numbers render as decimal, anything else is empty.
pub fn canonical_time_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.to_string(),
        },
        _ => String::new(),
    }
}
