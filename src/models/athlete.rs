use super::base::{decode_list, opt_string, required_id, unwrap_object, Link};
use super::team::Team;
use crate::utils::convert::{opt_int, parse_datetime, safe_bool};
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    pub espn_id: String,
    pub uid: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub display_name: String,
    pub short_name: Option<String>,
    /// `None` for free agents or when the team was not requested.
    pub team: Option<Team>,
    pub position: Option<String>,
    pub position_abbreviation: Option<String>,
    pub jersey: Option<String>,
    pub is_active: bool,
    /// Display form, e.g. `6' 8"`.
    pub height: Option<String>,
    /// Pounds.
    pub weight: Option<i64>,
    pub age: Option<i64>,
    pub birth_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub headshot: Option<String>,
    pub links: Vec<Link>,
    #[serde(skip)]
    pub raw_data: Option<Value>,
}

impl Athlete {
    /// Accepts the bare athlete object or one wrapped as `{"athlete": {...}}`.
    pub fn from_espn_data(data: &Value, team: Option<&Team>) -> Result<Self> {
        let wrapped = data.get("athlete").is_some_and(Value::is_object);
        let athlete = unwrap_object(data, "athlete");
        let id_path = if wrapped { "athlete.id" } else { "id" };
        let position = &athlete["position"];

        Ok(Self {
            espn_id: required_id(athlete, id_path, "athlete_model")?,
            uid: opt_string(athlete, "uid"),
            first_name: opt_string(athlete, "firstName").unwrap_or_default(),
            last_name: opt_string(athlete, "lastName").unwrap_or_default(),
            full_name: opt_string(athlete, "fullName").unwrap_or_default(),
            display_name: opt_string(athlete, "displayName").unwrap_or_default(),
            short_name: opt_string(athlete, "shortName"),
            team: team.cloned(),
            position: opt_string(position, "name").or_else(|| opt_string(position, "displayName")),
            position_abbreviation: opt_string(position, "abbreviation"),
            jersey: opt_string(athlete, "jersey"),
            is_active: safe_bool(&athlete["active"], true),
            height: opt_string(athlete, "displayHeight").or_else(|| opt_string(athlete, "height")),
            weight: opt_int(&athlete["weight"]),
            age: opt_int(&athlete["age"]),
            birth_date: athlete["dateOfBirth"]
                .as_str()
                .and_then(parse_datetime)
                .map(|dt| dt.date_naive()),
            birth_place: opt_string(&athlete["birthPlace"], "city"),
            headshot: opt_string(&athlete["headshot"], "href"),
            links: decode_list(athlete, "links", "athlete_model")?,
            raw_data: Some(athlete.clone()),
        })
    }

    /// Display name, or the full name when ESPN sent none.
    pub fn name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.full_name
        } else {
            &self.display_name
        }
    }

    pub fn team_name(&self) -> Option<&str> {
        self.team.as_ref().map(|t| t.display_name.as_str())
    }

    pub fn position_display(&self) -> &str {
        self.position_abbreviation
            .as_deref()
            .or(self.position.as_deref())
            .unwrap_or("Unknown")
    }
}

impl fmt::Display for Athlete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let team = self
            .team
            .as_ref()
            .map(|t| t.abbreviation.as_str())
            .unwrap_or("FA");
        write!(f, "{} ({})", self.display_name, team)
    }
}
