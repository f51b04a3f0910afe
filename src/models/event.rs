//! Events (games, matches, races) and the competitors taking part.

use super::base::{decode_list, nest_error, opt_string, required_id, Link, Record, Statistic};
use super::sport::League;
use super::team::Team;
use super::venue::Venue;
use crate::utils::convert::{opt_bool, opt_int, parse_datetime, safe_int};
use crate::{Error, Result};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Regular season, the default when ESPN omits the season type.
const REGULAR_SEASON: i64 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Scheduled,
    InProgress,
    Final,
    Postponed,
    Cancelled,
}

impl EventStatus {
    /// Map ESPN's `status.type` object.
    ///
    /// The status name wins for postponed/cancelled games since ESPN reports
    /// those with state `post` (or `pre`).
    pub fn from_status_type(type_data: &Value) -> Self {
        match type_data.get("name").and_then(Value::as_str) {
            Some("STATUS_POSTPONED") => return EventStatus::Postponed,
            Some("STATUS_CANCELED") | Some("STATUS_CANCELLED") => return EventStatus::Cancelled,
            _ => {}
        }
        match type_data.get("state").and_then(Value::as_str) {
            Some("in") => EventStatus::InProgress,
            Some("post") => EventStatus::Final,
            _ => EventStatus::Scheduled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Scheduled => "scheduled",
            EventStatus::InProgress => "in_progress",
            EventStatus::Final => "final",
            EventStatus::Postponed => "postponed",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub league: League,
    pub venue: Option<Venue>,
    pub espn_id: String,
    pub uid: Option<String>,
    pub date: DateTime<Utc>,
    pub name: String,
    pub short_name: Option<String>,
    pub season_year: i64,
    /// 1 preseason, 2 regular season, 3 postseason.
    pub season_type: i64,
    pub season_slug: Option<String>,
    pub week: Option<i64>,
    pub status: EventStatus,
    pub status_detail: Option<String>,
    pub clock: Option<String>,
    pub period: Option<i64>,
    pub attendance: Option<i64>,
    pub broadcasts: Vec<Value>,
    pub competitors: Vec<Competitor>,
    pub links: Vec<Link>,
    #[serde(skip)]
    pub raw_data: Option<Value>,
}

impl Event {
    /// Build from a scoreboard event or a summary `header`.
    ///
    /// Venue, attendance, broadcasts and competitors come from the first
    /// competition. An unparseable date falls back to the current time.
    pub fn from_espn_data(data: &Value, league: &League) -> Result<Self> {
        let espn_id = required_id(data, "id", "event_model")?;
        let competition = &data["competitions"][0];

        let status_data = match data.get("status") {
            Some(s) if s.is_object() => s,
            _ => &competition["status"],
        };
        let type_data = &status_data["type"];

        let date = data["date"]
            .as_str()
            .or_else(|| competition["date"].as_str())
            .and_then(parse_datetime)
            .unwrap_or_else(Utc::now);

        let season = &data["season"];

        let venue = match competition.get("venue") {
            Some(v) if v.is_object() => Some(
                Venue::from_espn_data(v).map_err(|e| nest_error(e, "competitions[0].venue"))?,
            ),
            _ => None,
        };

        let competitors = competition
            .get("competitors")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .enumerate()
                    .map(|(i, c)| {
                        Competitor::from_espn_data(c, &espn_id, league).map_err(|e| {
                            nest_error(e, &format!("competitions[0].competitors[{}]", i))
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            league: league.clone(),
            venue,
            uid: opt_string(data, "uid"),
            date,
            name: opt_string(data, "name").unwrap_or_default(),
            short_name: opt_string(data, "shortName"),
            season_year: opt_int(&season["year"]).unwrap_or_else(|| i64::from(date.year())),
            season_type: safe_int(&season["type"], REGULAR_SEASON),
            season_slug: opt_string(season, "slug"),
            week: opt_int(&data["week"]["number"]),
            status: EventStatus::from_status_type(type_data),
            status_detail: opt_string(type_data, "detail"),
            clock: opt_string(status_data, "displayClock"),
            period: opt_int(&status_data["period"]),
            attendance: opt_int(&competition["attendance"]),
            broadcasts: competition["broadcasts"]
                .as_array()
                .cloned()
                .unwrap_or_default(),
            competitors,
            links: decode_list(data, "links", "event_model")?,
            raw_data: Some(data.clone()),
            espn_id,
        })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, EventStatus::Final | EventStatus::Cancelled)
    }

    pub fn is_live(&self) -> bool {
        self.status == EventStatus::InProgress
    }

    /// ESPN's status detail (`"Final/OT"`), else the status in words.
    pub fn display_status(&self) -> String {
        match &self.status_detail {
            Some(detail) if !detail.is_empty() => detail.clone(),
            _ => self.status.as_str().replace('_', " "),
        }
    }

    pub fn home(&self) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.is_home())
    }

    pub fn away(&self) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.is_away())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .short_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(Some(self.name.as_str()).filter(|n| !n.is_empty()))
            .unwrap_or("Unknown Event");
        write!(f, "{} ({})", name, self.date.format("%Y-%m-%d"))
    }
}

/// One side of an event: a team plus its game-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    /// Id of the event this competitor belongs to.
    pub event_id: String,
    pub team: Team,
    /// `home` or `away`.
    pub home_away: String,
    /// Score as ESPN renders it; empty before the game.
    pub score: String,
    pub winner: Option<bool>,
    pub line_scores: Vec<Value>,
    pub records: Vec<Record>,
    pub statistics: Vec<Statistic>,
    pub leaders: Vec<Value>,
    pub order: i64,
    #[serde(skip)]
    pub raw_data: Option<Value>,
}

impl Competitor {
    pub fn from_espn_data(data: &Value, event_id: &str, league: &League) -> Result<Self> {
        let team_data = match data.get("team") {
            Some(t) if t.is_object() => t,
            _ => return Err(Error::missing_field("team", "competitor_model")),
        };
        let list = |key: &str| data[key].as_array().cloned().unwrap_or_default();

        Ok(Self {
            event_id: event_id.to_string(),
            team: Team::from_espn_data(team_data, league).map_err(|e| nest_error(e, "team"))?,
            home_away: opt_string(data, "homeAway").unwrap_or_else(|| "away".to_string()),
            score: score_text(&data["score"]),
            winner: opt_bool(&data["winner"]),
            line_scores: list("linescores"),
            records: decode_list(data, "records", "competitor_model")?,
            statistics: decode_list(data, "statistics", "competitor_model")?,
            leaders: list("leaders"),
            order: safe_int(&data["order"], 0),
            raw_data: Some(data.clone()),
        })
    }

    pub fn score_int(&self) -> Option<i64> {
        self.score.trim().parse().ok()
    }

    pub fn is_home(&self) -> bool {
        self.home_away == "home"
    }

    pub fn is_away(&self) -> bool {
        self.home_away == "away"
    }
}

/// Site API scores are strings, core API scores are `{"value": 102.0, "displayValue": "102"}`.
fn score_text(score: &Value) -> String {
    if let Some(shown) = opt_string(score, "displayValue") {
        return shown;
    }
    match score {
        Value::String(s) => s.clone(),
        Value::Number(_) => opt_int(score).map(|n| n.to_string()).unwrap_or_default(),
        _ => String::new(),
    }
}

impl fmt::Display for Competitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.team.abbreviation, self.home_away)?;
        if !self.score.is_empty() {
            write!(f, " {}", self.score)?;
        }
        Ok(())
    }
}
