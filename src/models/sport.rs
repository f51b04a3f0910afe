//! Sports and leagues, plus the registry of the ones ESPN is most often queried for.

use super::base::{opt_string, unwrap_object};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sport {
    /// URL segment, e.g. `basketball`.
    pub slug: String,
    pub name: String,
}

impl Sport {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
        }
    }

    /// Predefined sport by slug.
    pub fn lookup(slug: &str) -> Option<&'static Sport> {
        SPORTS.iter().find(|s| s.slug == slug)
    }

    /// Predefined sport, or an ad-hoc one named after its slug.
    pub fn resolve(slug: &str) -> Sport {
        Self::lookup(slug)
            .cloned()
            .unwrap_or_else(|| Sport::new(slug, slug))
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub sport: Sport,
    /// URL segment, e.g. `nba` or `eng.1`.
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(skip)]
    pub raw_data: Option<Value>,
}

impl League {
    pub fn new(
        sport: Sport,
        slug: impl Into<String>,
        name: impl Into<String>,
        abbreviation: Option<&str>,
    ) -> Self {
        Self {
            sport,
            slug: slug.into(),
            name: name.into(),
            abbreviation: abbreviation.map(str::to_string),
            raw_data: None,
        }
    }

    pub fn sport_slug(&self) -> &str {
        &self.sport.slug
    }

    /// Abbreviation, or the upper-cased slug.
    pub fn short_label(&self) -> String {
        self.abbreviation
            .clone()
            .unwrap_or_else(|| self.slug.to_uppercase())
    }

    /// Predefined league by slug.
    pub fn lookup(slug: &str) -> Option<&'static League> {
        LEAGUES.iter().find(|l| l.slug == slug)
    }

    /// Predefined league when sport and slug match one, otherwise an ad-hoc
    /// league so arbitrary ESPN leagues (`soccer/eng.1`) still work.
    pub fn resolve(sport: &str, league: &str) -> League {
        match Self::lookup(league) {
            Some(known) if known.sport.slug == sport => known.clone(),
            _ => League::new(Sport::resolve(sport), league, league.to_uppercase(), None),
        }
    }

    /// Build from a core API league resource.
    pub fn from_espn_data(data: &Value, sport: &Sport) -> Result<Self> {
        let data = unwrap_object(data, "league");
        let slug = opt_string(data, "slug")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::missing_field("slug", "league_model"))?;
        let name = opt_string(data, "name")
            .or_else(|| opt_string(data, "displayName"))
            .unwrap_or_else(|| slug.to_uppercase());
        Ok(Self {
            sport: sport.clone(),
            abbreviation: opt_string(data, "abbreviation"),
            slug,
            name,
            raw_data: Some(data.clone()),
        })
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.sport.name)
    }
}

static SPORTS: Lazy<Vec<Sport>> = Lazy::new(|| {
    [
        ("basketball", "Basketball"),
        ("football", "Football"),
        ("baseball", "Baseball"),
        ("hockey", "Hockey"),
        ("soccer", "Soccer"),
        ("mma", "Mixed Martial Arts"),
        ("golf", "Golf"),
        ("tennis", "Tennis"),
        ("racing", "Racing"),
    ]
    .into_iter()
    .map(|(slug, name)| Sport::new(slug, name))
    .collect()
});

static LEAGUES: Lazy<Vec<League>> = Lazy::new(|| {
    [
        ("basketball", "nba", "NBA", "NBA"),
        ("basketball", "wnba", "WNBA", "WNBA"),
        ("football", "nfl", "NFL", "NFL"),
        ("baseball", "mlb", "MLB", "MLB"),
        ("hockey", "nhl", "NHL", "NHL"),
        ("soccer", "mls", "MLS", "MLS"),
        ("football", "college-football", "College Football", "NCAAF"),
        (
            "basketball",
            "mens-college-basketball",
            "Men's College Basketball",
            "NCAAM",
        ),
    ]
    .into_iter()
    .map(|(sport, slug, name, abbr)| League::new(Sport::resolve(sport), slug, name, Some(abbr)))
    .collect()
});

/// All predefined sports.
pub fn sports() -> &'static [Sport] {
    &SPORTS
}

/// All predefined leagues.
pub fn leagues() -> &'static [League] {
    &LEAGUES
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registry_lookups() {
        assert_eq!(sports().len(), 9);
        assert_eq!(leagues().len(), 8);
        assert_eq!(Sport::lookup("mma").unwrap().name, "Mixed Martial Arts");
        let ncaam = League::lookup("mens-college-basketball").unwrap();
        assert_eq!(ncaam.sport_slug(), "basketball");
        assert_eq!(ncaam.abbreviation.as_deref(), Some("NCAAM"));
        assert!(League::lookup("xfl").is_none());
    }

    #[test]
    fn display() {
        let nba = League::lookup("nba").unwrap();
        assert_eq!(nba.to_string(), "NBA (Basketball)");
        assert_eq!(nba.sport.to_string(), "Basketball");
    }

    #[test]
    fn resolve_falls_back_to_ad_hoc_league() {
        let epl = League::resolve("soccer", "eng.1");
        assert_eq!(epl.sport.name, "Soccer");
        assert_eq!(epl.short_label(), "ENG.1");
        assert!(epl.abbreviation.is_none());

        // Slug known but under another sport.
        let odd = League::resolve("hockey", "nba");
        assert_eq!(odd.sport_slug(), "hockey");
        assert_eq!(League::resolve("basketball", "nba").name, "NBA");
    }

    #[test]
    fn from_core_api_payload() {
        let sport = Sport::resolve("football");
        let league = League::from_espn_data(
            &json!({
                "id": "28",
                "name": "National Football League",
                "abbreviation": "NFL",
                "slug": "nfl"
            }),
            &sport,
        )
        .unwrap();
        assert_eq!(league.slug, "nfl");
        assert_eq!(league.name, "National Football League");
        assert!(league.raw_data.is_some());

        let err = League::from_espn_data(&json!({"name": "x"}), &sport).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
}
