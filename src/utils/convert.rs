//! Lenient coercions for loosely-typed ESPN JSON.
//!
//! ESPN is inconsistent about scalar encodings: ids are sometimes numbers and
//! sometimes strings, scores come back as `"102"`, weights as `220.0`. These
//! helpers coerce whatever arrived and fall back to a default.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Parse the timestamp formats ESPN emits.
///
/// Handles RFC 3339 (`2024-01-15T20:00:00Z`), minute precision with a `Z`
/// suffix (`2024-01-15T20:00Z`) and bare dates (`2024-01-15`, taken as UTC
/// midnight).
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = raw.strip_suffix('Z').unwrap_or(raw);
    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// [`parse_datetime`] that falls back to the current time.
pub fn parse_datetime_or_now(raw: &str) -> DateTime<Utc> {
    parse_datetime(raw).unwrap_or_else(Utc::now)
}

pub fn opt_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

pub fn safe_int(value: &Value, default: i64) -> i64 {
    opt_int(value).unwrap_or(default)
}

pub fn opt_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn safe_float(value: &Value, default: f64) -> f64 {
    opt_float(value).unwrap_or(default)
}

/// Strings pass through, numbers and booleans are rendered, null and
/// containers yield `None`.
pub fn opt_str(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn safe_str(value: &Value, default: &str) -> String {
    opt_str(value).unwrap_or_else(|| default.to_string())
}

pub fn opt_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => Some(matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        )),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        _ => None,
    }
}

pub fn safe_bool(value: &Value, default: bool) -> bool {
    opt_bool(value).unwrap_or(default)
}

/// Walk object keys; `None` as soon as a key is missing or a non-object is hit.
pub fn extract_nested_value<'a>(data: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .try_fold(data, |current, key| current.as_object()?.get(*key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn parse_datetime_formats() {
        let dt = parse_datetime("2024-01-01T12:34:56Z").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 1, 1));
        assert_eq!(dt.second(), 56);

        let dt = parse_datetime("2024-01-15T20:00Z").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (20, 0));

        let dt = parse_datetime("2024-01-15T20:00:00-05:00").unwrap();
        assert_eq!(dt.hour(), 1);
        assert_eq!(dt.day(), 16);

        let dt = parse_datetime("1984-12-30").unwrap();
        assert_eq!(dt.year(), 1984);
    }

    #[test]
    fn parse_datetime_invalid() {
        assert!(parse_datetime("not-a-date").is_none());
        assert!(parse_datetime("").is_none());
        let before = Utc::now();
        assert!(parse_datetime_or_now("not-a-date") >= before);
    }

    #[test]
    fn ints() {
        assert_eq!(safe_int(&json!("10"), 0), 10);
        assert_eq!(safe_int(&json!(220.0), 0), 220);
        assert_eq!(safe_int(&json!("bad"), 5), 5);
        assert_eq!(safe_int(&Value::Null, 7), 7);
    }

    #[test]
    fn floats() {
        assert_eq!(safe_float(&json!("2.75"), 0.0), 2.75);
        assert_eq!(safe_float(&json!(2), 0.0), 2.0);
        assert_eq!(safe_float(&json!("bad"), 1.5), 1.5);
    }

    #[test]
    fn strings() {
        assert_eq!(safe_str(&json!(123), ""), "123");
        assert_eq!(safe_str(&Value::Null, ""), "");
        assert_eq!(safe_str(&json!({"a": 1}), "x"), "x");
    }

    #[test]
    fn bools() {
        assert!(safe_bool(&json!(true), false));
        assert!(safe_bool(&json!("true"), false));
        assert!(safe_bool(&json!("YES"), false));
        assert!(!safe_bool(&json!("false"), true));
        assert!(!safe_bool(&json!(0), true));
        assert!(safe_bool(&json!(1), false));
        assert!(safe_bool(&Value::Null, true));
    }

    #[test]
    fn nested_lookup() {
        let data = json!({"a": {"b": {"c": 1}}});
        assert_eq!(extract_nested_value(&data, &["a", "b", "c"]), Some(&json!(1)));
        assert_eq!(extract_nested_value(&data, &["a", "x"]), None);
        assert_eq!(extract_nested_value(&data, &["a", "b", "c", "d"]), None);
    }
}
