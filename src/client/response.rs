//! Response classification and the typed response wrapper.

use crate::models::base::nest_error;
use crate::models::{Athlete, Event, League, Sport, Team, Venue};
use crate::utils::convert::opt_int;
use crate::utils::json_path::PathMapper;
use crate::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, warn};

/// Longest slice of an error body kept on [`Error::Remote`].
const MAX_ERROR_BODY: usize = 512;

/// A successful ESPN response: decoded JSON plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EspnResponse {
    pub data: Value,
    pub status_code: u16,
    pub url: String,
}

impl EspnResponse {
    pub fn new(data: Value, status_code: u16, url: impl Into<String>) -> Self {
        Self {
            data,
            status_code,
            url: url.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Deserialize the whole payload into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        T::deserialize(&self.data).map_err(|e| {
            Error::validation_with_context(
                format!("response does not match the expected shape: {}", e),
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("response")
                    .with_url(self.url.clone()),
            )
        })
    }

    /// Dotted-path lookup, e.g. `"sports[0].leagues[0].teams"`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        PathMapper::get_path(&self.data, path)
    }

    /// Events of a scoreboard response.
    pub fn events(&self, league: &League) -> Result<Vec<Event>> {
        self.decode_each("events", |item| Event::from_espn_data(item, league))
    }

    /// Teams of a teams listing (`sports[0].leagues[0].teams[].team`).
    pub fn teams(&self, league: &League) -> Result<Vec<Team>> {
        self.decode_each("sports[0].leagues[0].teams", |item| {
            Team::from_espn_data(item, league)
        })
    }

    /// The team of a single-team response.
    pub fn team(&self, league: &League) -> Result<Team> {
        match self.data.get("team") {
            Some(team) if team.is_object() => {
                Team::from_espn_data(team, league).map_err(|e| self.located(nest_error(e, "team")))
            }
            _ => Err(self.located(Error::missing_field("team", "response"))),
        }
    }

    /// The event of a summary response.
    ///
    /// The summary puts the event under `header`; venue and attendance live in
    /// `gameInfo` and fill in whatever the header lacks.
    pub fn event_summary(&self, league: &League) -> Result<Event> {
        let header = match self.data.get("header") {
            Some(h) if h.is_object() => h,
            _ => return Err(self.located(Error::missing_field("header", "response"))),
        };
        let mut event = Event::from_espn_data(header, league)
            .map_err(|e| self.located(nest_error(e, "header")))?;

        let game_info = &self.data["gameInfo"];
        if event.venue.is_none() {
            if let Some(venue) = game_info.get("venue").filter(|v| v.is_object()) {
                event.venue = Some(
                    Venue::from_espn_data(venue)
                        .map_err(|e| self.located(nest_error(e, "gameInfo.venue")))?,
                );
            }
        }
        if event.attendance.is_none() {
            event.attendance = opt_int(&game_info["attendance"]);
        }
        Ok(event)
    }

    /// League of a core API league resource.
    pub fn league(&self, sport: &Sport) -> Result<League> {
        League::from_espn_data(&self.data, sport).map_err(|e| self.located(e))
    }

    /// Athletes embedded in the payload.
    ///
    /// Core API listings return `items`, mostly as `$ref` links; only entries
    /// carrying an `id` are decoded. Roster payloads use `athletes`.
    pub fn athletes(&self, team: Option<&Team>) -> Result<Vec<Athlete>> {
        let key = if self.data.get("items").is_some_and(Value::is_array) {
            "items"
        } else {
            "athletes"
        };
        PathMapper::get_array(&self.data, key)
            .iter()
            .enumerate()
            .filter(|(_, item)| item.get("id").is_some() || item.get("athlete").is_some())
            .map(|(i, item)| {
                Athlete::from_espn_data(item, team)
                    .map_err(|e| self.located(nest_error(e, &format!("{}[{}]", key, i))))
            })
            .collect()
    }

    /// `$ref` links of a core API listing.
    pub fn athlete_refs(&self) -> Vec<&str> {
        PathMapper::get_array(&self.data, "items")
            .iter()
            .filter_map(|item| item.get("$ref").and_then(Value::as_str))
            .collect()
    }

    /// Headlines of a news response.
    pub fn headlines(&self) -> Vec<&str> {
        PathMapper::get_array(&self.data, "articles")
            .iter()
            .filter_map(|a| a.get("headline").and_then(Value::as_str))
            .collect()
    }

    /// Total item count reported by paged core API listings.
    pub fn count(&self) -> Option<i64> {
        opt_int(&self.data["count"])
    }

    fn decode_each<T>(&self, path: &str, decode: impl Fn(&Value) -> Result<T>) -> Result<Vec<T>> {
        PathMapper::get_array(&self.data, path)
            .iter()
            .enumerate()
            .map(|(i, item)| {
                decode(item).map_err(|e| self.located(nest_error(e, &format!("{}[{}]", path, i))))
            })
            .collect()
    }

    /// Attach the response URL to validation errors.
    fn located(&self, err: Error) -> Error {
        match err {
            Error::Validation { message, context } => Error::Validation {
                message,
                context: context.with_url(self.url.clone()),
            },
            other => other,
        }
    }
}

/// Classify a completed HTTP exchange.
///
/// 404, 429 and other 4xx/5xx statuses become errors; anything else must
/// carry a JSON body.
pub(crate) fn handle_response(
    status: u16,
    url: &str,
    retry_after: Option<Duration>,
    body: &str,
) -> Result<EspnResponse> {
    match status {
        404 => {
            warn!(url, "espn_resource_not_found");
            return Err(Error::NotFound {
                url: url.to_string(),
            });
        }
        429 => {
            warn!(
                url,
                retry_after_secs = retry_after.map(|d| d.as_secs()),
                "espn_rate_limited"
            );
            return Err(Error::RateLimited {
                url: url.to_string(),
                retry_after,
            });
        }
        500.. => {
            error!(url, status_code = status, "espn_server_error");
            return Err(remote(status, url, body));
        }
        400.. => {
            error!(url, status_code = status, "espn_client_error");
            return Err(remote(status, url, body));
        }
        _ => {}
    }

    let data = serde_json::from_str(body).map_err(|e| {
        error!(url, error = %e, "espn_json_parse_error");
        Error::Decode {
            url: url.to_string(),
            source: e,
        }
    })?;
    Ok(EspnResponse::new(data, status, url))
}

fn remote(status: u16, url: &str, body: &str) -> Error {
    let mut end = body.len().min(MAX_ERROR_BODY);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    Error::Remote {
        status,
        url: url.to_string(),
        body: body[..end].to_string(),
    }
}
