//! Dotted-path lookup into ESPN payloads.
//!
//! Supports:
//! - Nested keys (`"header.season.year"`)
//! - Bracket indexing (`"sports[0].leagues[0].teams"`)
//! - Dot indexing (`"events.0.id"`)
//! - `*` for the first element of an array

use serde_json::Value;

/// Path mapper for reading values out of JSON with dot-notation paths.
pub struct PathMapper;

impl PathMapper {
    /// Resolve `path` against `obj`. A leading `$.` is accepted and ignored.
    pub fn get_path<'a>(obj: &'a Value, path: &str) -> Option<&'a Value> {
        let normalized = path.trim().trim_start_matches("$.");
        if normalized.is_empty() {
            return None;
        }

        let mut current = obj;
        for part in normalized.split('.') {
            if part.is_empty() {
                return None;
            }

            match part.find('[') {
                Some(bracket) => {
                    let key = &part[..bracket];
                    if !key.is_empty() {
                        current = current.as_object()?.get(key)?;
                    }
                    // "teams[0][1]" style chains
                    for index in part[bracket..].split('[').skip(1) {
                        current = Self::index(current, index.strip_suffix(']')?)?;
                    }
                }
                None => {
                    current = match current {
                        Value::Object(map) => map.get(part)?,
                        Value::Array(_) => Self::index(current, part)?,
                        _ => return None,
                    };
                }
            }
        }

        Some(current)
    }

    fn index<'a>(value: &'a Value, index: &str) -> Option<&'a Value> {
        let arr = value.as_array()?;
        if index == "*" {
            return arr.first();
        }
        arr.get(index.parse::<usize>().ok()?)
    }

    /// String value at `path`; numbers and booleans are rendered.
    pub fn get_string(obj: &Value, path: &str) -> Option<String> {
        Self::get_path(obj, path).and_then(crate::utils::convert::opt_str)
    }

    /// Array at `path`, or an empty slice.
    pub fn get_array<'a>(obj: &'a Value, path: &str) -> &'a [Value] {
        Self::get_path(obj, path)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn teams_payload() -> Value {
        json!({
            "sports": [{
                "leagues": [{
                    "teams": [
                        {"team": {"id": "1", "abbreviation": "ATL"}},
                        {"team": {"id": 2, "abbreviation": "BOS"}}
                    ]
                }]
            }]
        })
    }

    #[test]
    fn bracket_and_dot_indexing() {
        let v = teams_payload();
        assert_eq!(
            PathMapper::get_string(&v, "sports[0].leagues[0].teams[1].team.abbreviation"),
            Some("BOS".to_string())
        );
        assert_eq!(
            PathMapper::get_string(&v, "sports.0.leagues.0.teams.0.team.id"),
            Some("1".to_string())
        );
        assert_eq!(
            PathMapper::get_string(&v, "$.sports[*].leagues[*].teams[1].team.id"),
            Some("2".to_string())
        );
    }

    #[test]
    fn missing_paths() {
        let v = teams_payload();
        assert!(PathMapper::get_path(&v, "").is_none());
        assert!(PathMapper::get_path(&v, "sports[3]").is_none());
        assert!(PathMapper::get_path(&v, "sports[x]").is_none());
        assert!(PathMapper::get_path(&v, "sports..leagues").is_none());
        assert!(PathMapper::get_path(&v, "events").is_none());
        assert!(PathMapper::get_array(&v, "events").is_empty());
    }

    #[test]
    fn array_helper() {
        let v = teams_payload();
        assert_eq!(PathMapper::get_array(&v, "sports[0].leagues[0].teams").len(), 2);
    }
}
