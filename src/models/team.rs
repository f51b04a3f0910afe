use super::base::{decode_list, opt_string, required_id, unwrap_object, Link, Logo};
use super::sport::League;
use crate::utils::convert::safe_bool;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub league: League,
    pub espn_id: String,
    pub uid: Option<String>,
    pub slug: Option<String>,
    pub abbreviation: String,
    pub display_name: String,
    pub short_display_name: Option<String>,
    /// Team name only, e.g. `Celtics`.
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub location: Option<String>,
    /// Hex without `#`.
    pub color: Option<String>,
    pub alternate_color: Option<String>,
    pub is_active: bool,
    pub is_all_star: bool,
    pub logos: Vec<Logo>,
    pub links: Vec<Link>,
    #[serde(skip)]
    pub raw_data: Option<Value>,
}

impl Team {
    /// Accepts either the bare team object or one wrapped as `{"team": {...}}`.
    pub fn from_espn_data(data: &Value, league: &League) -> Result<Self> {
        let wrapped = data.get("team").is_some_and(Value::is_object);
        let team = unwrap_object(data, "team");
        let id_path = if wrapped { "team.id" } else { "id" };

        Ok(Self {
            league: league.clone(),
            espn_id: required_id(team, id_path, "team_model")?,
            uid: opt_string(team, "uid"),
            slug: opt_string(team, "slug"),
            abbreviation: opt_string(team, "abbreviation").unwrap_or_default(),
            display_name: opt_string(team, "displayName").unwrap_or_default(),
            short_display_name: opt_string(team, "shortDisplayName"),
            name: opt_string(team, "name"),
            nickname: opt_string(team, "nickname"),
            location: opt_string(team, "location"),
            color: opt_string(team, "color"),
            alternate_color: opt_string(team, "alternateColor"),
            is_active: safe_bool(&team["isActive"], true),
            is_all_star: safe_bool(&team["isAllStar"], false),
            logos: decode_list(team, "logos", "team_model")?,
            links: decode_list(team, "links", "team_model")?,
            raw_data: Some(team.clone()),
        })
    }

    /// `default` logo if there is one, else the first.
    pub fn primary_logo(&self) -> Option<&str> {
        self.logos
            .iter()
            .find(|logo| logo.has_rel("default"))
            .or_else(|| self.logos.first())
            .map(|logo| logo.href.as_str())
    }

    /// Shortest available name.
    pub fn team_name(&self) -> &str {
        [&self.name, &self.short_display_name]
            .into_iter()
            .filter_map(|n| n.as_deref())
            .find(|n| !n.is_empty())
            .unwrap_or(&self.display_name)
    }

    pub fn full_name(&self) -> &str {
        &self.display_name
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.league.short_label())
    }
}
