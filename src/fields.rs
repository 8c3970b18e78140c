//! Best-effort accessors over loosely-typed API payloads.
//!
//! Backends omit fields freely and occasionally return numbers as strings.
//! Every accessor here supplies a default instead of failing, so a malformed
//! response degrades the output rather than aborting the call.

use serde_json::Value;

/// Stand-in for an absent object; every accessor reads it as "all fields missing".
pub static NULL: Value = Value::Null;

/// Iterates the object entries of a list payload. Anything that is not a
/// list yields nothing; non-object entries are skipped.
pub fn records(value: &Value) -> impl Iterator<Item = &Value> {
    value
        .as_array()
        .into_iter()
        .flatten()
        .filter(|entry| entry.is_object())
}

pub fn text(value: &Value, key: &str) -> String {
    text_or(value, key, "")
}

pub fn text_or(value: &Value, key: &str, default: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => default.to_string(),
    }
}

pub fn uint(value: &Value, key: &str) -> u64 {
    uint_or(value, key, 0)
}

pub fn uint_or(value: &Value, key: &str, default: u64) -> u64 {
    match value.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

pub fn int(value: &Value, key: &str) -> i64 {
    opt_int(value, key).unwrap_or(0)
}

pub fn opt_int(value: &Value, key: &str) -> Option<i64> {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn float(value: &Value, key: &str) -> f64 {
    value.get(key).map(as_float).unwrap_or(0.0)
}

/// Numeric view of a scalar, accepting numeric strings such as `"0.42"`.
pub fn as_float(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Booleans arrive either as JSON booleans or as 0/1 integers.
pub fn flag(value: &Value, key: &str) -> bool {
    match value.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

/// Passes a field through untouched, or `default` when absent or null.
pub fn raw(value: &Value, key: &str, default: Value) -> Value {
    match value.get(key) {
        Some(Value::Null) | None => default,
        Some(v) => v.clone(),
    }
}

/// Nested object lookup; missing or non-object children read as null,
/// which every accessor above treats as "all fields absent".
pub fn child<'a>(value: &'a Value, key: &str) -> &'a Value {
    match value.get(key) {
        Some(v) if v.is_object() => v,
        _ => &NULL,
    }
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// `used / max(total, 1) * 100`, rounded to two places.
pub fn percent(used: f64, total: f64) -> f64 {
    round2(used / total.max(1.0) * 100.0)
}

pub fn ratio_percent(fraction: f64) -> f64 {
    round2(fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_percent_guards_zero_total() {
        assert_eq!(percent(5.0, 0.0), 500.0);
        assert_eq!(percent(1.0, 3.0), 33.33);
        assert_eq!(percent(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_records_drop_non_objects() {
        let list = json!([{ "a": 1 }, "junk", 3, null, { "a": 2 }]);
        assert_eq!(records(&list).count(), 2);
        assert_eq!(records(&json!({ "a": 1 })).count(), 0);
        assert_eq!(records(&Value::Null).count(), 0);
    }

    #[test]
    fn test_defaults_and_coercion() {
        let v = json!({ "mem": 1024.7, "maxmem": "2048", "name": null, "online": 1 });
        assert_eq!(uint(&v, "mem"), 1024);
        assert_eq!(uint(&v, "maxmem"), 2048);
        assert_eq!(uint(&v, "missing"), 0);
        assert_eq!(text(&v, "name"), "");
        assert_eq!(text_or(&v, "status", "unknown"), "unknown");
        assert!(flag(&v, "online"));
        assert!(!flag(&v, "local"));
        assert_eq!(opt_int(&v, "nodeid"), None);
        assert!(child(&v, "mem").is_null());
    }
}
