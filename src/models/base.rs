//! Small value objects shared by the entity models.
//!
//! These deserialize straight from ESPN's camelCase JSON. Keys the structs do
//! not name are kept in `extra` so nothing in the payload is lost.

use crate::utils::convert::{opt_float, opt_int, opt_str, parse_datetime};
use crate::{Error, ErrorContext, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(default)]
    pub rel: Vec<String>,
    pub href: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{} <{}>", text, self.href),
            None => f.write_str(&self.href),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Logo {
    pub href: String,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub width: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub height: Option<i64>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub rel: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_datetime")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Logo {
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rel.iter().any(|r| r == rel)
    }
}

impl fmt::Display for Logo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub zip_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [&self.city, &self.state, &self.zip_code, &self.country]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .filter(|p| !p.is_empty())
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// Win/loss style record (`"45-37"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub display_value: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub rank: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self
            .summary
            .as_deref()
            .or(self.display_value.as_deref())
            .unwrap_or("-");
        write!(f, "{}: {}", self.record_type, shown)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistic {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub short_display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub value: Option<f64>,
    #[serde(default)]
    pub display_value: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub rank: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.abbreviation.as_deref().unwrap_or(&self.name);
        match (&self.display_value, self.value) {
            (Some(shown), _) => write!(f, "{}: {}", label, shown),
            (None, Some(value)) => write!(f, "{}: {}", label, value),
            (None, None) => f.write_str(label),
        }
    }
}

/// ESPN sends numbers as strings (and the reverse) often enough that the
/// optional scalar fields go through the lenient converters.
mod lenient {
    use super::*;

    pub fn opt_i64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<i64>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(opt_int))
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<f64>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(opt_float))
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<Option<String>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(opt_str))
    }

    pub fn opt_datetime<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<Option<DateTime<Utc>>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?
            .as_ref()
            .and_then(Value::as_str)
            .and_then(parse_datetime))
    }
}

/// Decode the array at `data[key]` into `T`, skipping entries that are not
/// objects. A malformed object fails the whole list with a validation error
/// pointing at `key[index]`.
pub(crate) fn decode_list<T: DeserializeOwned>(
    data: &Value,
    key: &str,
    source: &str,
) -> Result<Vec<T>> {
    let Some(items) = data.get(key).and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.is_object())
        .map(|(i, item)| {
            T::deserialize(item).map_err(|e| {
                Error::validation_with_context(
                    format!("invalid `{}` entry: {}", key, e),
                    ErrorContext::new()
                        .with_field_path(format!("{}[{}]", key, i))
                        .with_details(e.to_string())
                        .with_source(source),
                )
            })
        })
        .collect()
}

/// The `id` of an ESPN object as a string; missing or empty ids are a
/// validation error.
pub(crate) fn required_id(data: &Value, path: &str, source: &str) -> Result<String> {
    opt_str(&data["id"])
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| Error::missing_field(path, source))
}

/// Object under `key`, or `data` itself when the payload is not wrapped.
pub(crate) fn unwrap_object<'a>(data: &'a Value, key: &str) -> &'a Value {
    match data.get(key) {
        Some(inner) if inner.is_object() => inner,
        _ => data,
    }
}

pub(crate) fn opt_string(data: &Value, key: &str) -> Option<String> {
    data.get(key).and_then(opt_str)
}

/// Prefix the field path of a validation error raised for a nested object.
pub(crate) fn nest_error(err: Error, prefix: &str) -> Error {
    match err {
        Error::Validation { message, context } => {
            let path = match &context.field_path {
                Some(inner) => format!("{}.{}", prefix, inner),
                None => prefix.to_string(),
            };
            Error::validation_with_context(
                message,
                ErrorContext {
                    field_path: Some(path),
                    ..context
                },
            )
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn link_defaults_and_extra_keys() {
        let link: Link = serde_json::from_value(json!({
            "href": "https://espn.com/nba/team/_/name/bos",
            "isExternal": false
        }))
        .unwrap();
        assert!(link.rel.is_empty());
        assert!(link.text.is_none());
        assert_eq!(link.extra.get("isExternal"), Some(&json!(false)));
        assert_eq!(link.to_string(), "https://espn.com/nba/team/_/name/bos");
    }

    #[test]
    fn logo_is_lenient_about_scalars() {
        let logo: Logo = serde_json::from_value(json!({
            "href": "https://a.espncdn.com/bos.png",
            "width": "500",
            "height": 500,
            "rel": ["full", "default"],
            "lastUpdated": "2018-06-05T12:12Z"
        }))
        .unwrap();
        assert_eq!(logo.width, Some(500));
        assert_eq!(logo.height, Some(500));
        assert!(logo.has_rel("default"));
        assert!(logo.last_updated.is_some());

        let logo: Logo = serde_json::from_value(json!({
            "href": "x",
            "lastUpdated": "not a date"
        }))
        .unwrap();
        assert!(logo.last_updated.is_none());
    }

    #[test]
    fn address_zip_code_accepts_numbers() {
        let address: Address = serde_json::from_value(json!({
            "city": "Boston",
            "state": "MA",
            "zipCode": 2114
        }))
        .unwrap();
        assert_eq!(address.zip_code.as_deref(), Some("2114"));
        assert_eq!(address.to_string(), "Boston, MA, 2114");
    }

    #[test]
    fn record_requires_type() {
        let record: Record = serde_json::from_value(json!({
            "type": "total",
            "summary": "64-18",
            "value": "0.78"
        }))
        .unwrap();
        assert_eq!(record.record_type, "total");
        assert_eq!(record.value, Some(0.78));
        assert_eq!(record.to_string(), "total: 64-18");

        assert!(serde_json::from_value::<Record>(json!({"summary": "1-0"})).is_err());
    }

    #[test]
    fn decode_list_skips_non_objects_and_reports_index() {
        let data = json!({
            "stats": [
                {"name": "points", "displayValue": "102"},
                "junk",
                {"displayValue": "7"}
            ]
        });
        let err = decode_list::<Statistic>(&data, "stats", "test").unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("stats[2]")
        );

        let data = json!({"stats": [{"name": "points", "displayValue": "102"}, 3]});
        let stats: Vec<Statistic> = decode_list(&data, "stats", "test").unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].to_string(), "points: 102");
        assert!(decode_list::<Statistic>(&json!({}), "stats", "test")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn required_id_rejects_missing_and_empty() {
        assert_eq!(required_id(&json!({"id": 12}), "id", "t").unwrap(), "12");
        assert!(required_id(&json!({"id": ""}), "id", "t").is_err());
        assert!(required_id(&json!({}), "team.id", "t").is_err());
    }
}
