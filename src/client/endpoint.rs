//! Request construction: base URL selection, path templates and query parameters.
//!
//! Every ESPN operation is described by an [`ApiRequest`] built here, so the
//! async and blocking clients issue byte-identical requests.

use crate::config::EspnConfig;
use crate::{Error, ErrorContext, Result};
use chrono::{DateTime, NaiveDate, TimeZone};
use std::fmt;

const SITE_SPORTS: &str = "/apis/site/v2/sports";
const CORE_SPORTS: &str = "/v2/sports";

pub const DEFAULT_TEAMS_LIMIT: u32 = 100;
pub const DEFAULT_ATHLETES_LIMIT: u32 = 100;

/// Which ESPN host a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointDomain {
    /// `site.api.espn.com`: scoreboards, teams, summaries, news.
    Site,
    /// `sports.core.api.espn.com`: league and athlete resources.
    Core,
}

impl EndpointDomain {
    pub fn base_url<'a>(&self, config: &'a EspnConfig) -> &'a str {
        match self {
            EndpointDomain::Site => &config.site_api_base_url,
            EndpointDomain::Core => &config.core_api_base_url,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointDomain::Site => "site",
            EndpointDomain::Core => "core",
        }
    }
}

impl fmt::Display for EndpointDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join the domain's base URL and `path` with exactly one `/`.
pub fn build_url(config: &EspnConfig, domain: EndpointDomain, path: &str) -> String {
    let base = domain.base_url(config).trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// Reject segments that would change the shape of the URL.
fn segment<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    let problem = if trimmed.is_empty() {
        Some("must not be empty")
    } else if trimmed.contains(['/', '?', '#']) {
        Some("must not contain '/', '?' or '#'")
    } else {
        None
    };
    match problem {
        None => Ok(trimmed),
        Some(reason) => Err(Error::validation_with_context(
            format!("{} {}", field, reason),
            ErrorContext::new()
                .with_field_path(field)
                .with_details(format!("got {:?}", value))
                .with_source("endpoint"),
        )),
    }
}

fn site_path(sport: &str, league: &str, resource: &str) -> Result<String> {
    Ok(format!(
        "{}/{}/{}/{}",
        SITE_SPORTS,
        segment("sport", sport)?,
        segment("league", league)?,
        resource
    ))
}

fn core_league_path(sport: &str, league: &str) -> Result<String> {
    Ok(format!(
        "{}/{}/leagues/{}",
        CORE_SPORTS,
        segment("sport", sport)?,
        segment("league", league)?
    ))
}

/// Date filter for scoreboard requests.
///
/// Raw strings go out as given (ESPN also accepts ranges like
/// `20240101-20240107`); calendar dates are rendered `YYYYMMDD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreboardDate {
    Raw(String),
    Date(NaiveDate),
}

impl ScoreboardDate {
    pub fn to_query_value(&self) -> String {
        match self {
            ScoreboardDate::Raw(s) => s.trim().to_string(),
            ScoreboardDate::Date(d) => d.format("%Y%m%d").to_string(),
        }
    }
}

impl From<&str> for ScoreboardDate {
    fn from(value: &str) -> Self {
        ScoreboardDate::Raw(value.to_string())
    }
}

impl From<String> for ScoreboardDate {
    fn from(value: String) -> Self {
        ScoreboardDate::Raw(value)
    }
}

impl From<NaiveDate> for ScoreboardDate {
    fn from(value: NaiveDate) -> Self {
        ScoreboardDate::Date(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for ScoreboardDate {
    fn from(value: DateTime<Tz>) -> Self {
        ScoreboardDate::Date(value.date_naive())
    }
}

/// Optional scoreboard filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreboardQuery {
    pub date: Option<ScoreboardDate>,
    pub limit: Option<u32>,
}

impl ScoreboardQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(mut self, date: impl Into<ScoreboardDate>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Paging and team filter for athlete listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AthletesQuery {
    pub team_id: Option<String>,
    pub limit: u32,
    pub page: u32,
}

impl Default for AthletesQuery {
    fn default() -> Self {
        Self {
            team_id: None,
            limit: DEFAULT_ATHLETES_LIMIT,
            page: 1,
        }
    }
}

impl AthletesQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

/// A fully described GET request against one of the ESPN hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub domain: EndpointDomain,
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Short operation name used in logs.
    pub operation: &'static str,
}

impl ApiRequest {
    pub fn new(domain: EndpointDomain, path: impl Into<String>) -> Self {
        Self {
            domain,
            path: path.into(),
            query: Vec::new(),
            operation: "get",
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    fn named(mut self, operation: &'static str) -> Self {
        self.operation = operation;
        self
    }

    pub fn url(&self, config: &EspnConfig) -> String {
        build_url(config, self.domain, &self.path)
    }

    pub fn scoreboard(sport: &str, league: &str, query: &ScoreboardQuery) -> Result<Self> {
        let mut req = Self::new(EndpointDomain::Site, site_path(sport, league, "scoreboard")?)
            .named("scoreboard");
        if let Some(date) = &query.date {
            let value = date.to_query_value();
            if !value.is_empty() {
                req = req.with_query("dates", value);
            }
        }
        if let Some(limit) = query.limit.filter(|l| *l > 0) {
            req = req.with_query("limit", limit);
        }
        Ok(req)
    }

    pub fn teams(sport: &str, league: &str, limit: u32) -> Result<Self> {
        Ok(
            Self::new(EndpointDomain::Site, site_path(sport, league, "teams")?)
                .named("teams")
                .with_query("limit", limit),
        )
    }

    pub fn team(sport: &str, league: &str, team_id: &str) -> Result<Self> {
        let resource = format!("teams/{}", segment("team_id", team_id)?);
        Ok(Self::new(EndpointDomain::Site, site_path(sport, league, &resource)?).named("team"))
    }

    pub fn event(sport: &str, league: &str, event_id: &str) -> Result<Self> {
        let event_id = segment("event_id", event_id)?;
        Ok(
            Self::new(EndpointDomain::Site, site_path(sport, league, "summary")?)
                .named("event")
                .with_query("event", event_id),
        )
    }

    pub fn news(sport: &str, league: &str, limit: Option<u32>) -> Result<Self> {
        let mut req =
            Self::new(EndpointDomain::Site, site_path(sport, league, "news")?).named("news");
        if let Some(limit) = limit.filter(|l| *l > 0) {
            req = req.with_query("limit", limit);
        }
        Ok(req)
    }

    pub fn league_info(sport: &str, league: &str) -> Result<Self> {
        Ok(Self::new(EndpointDomain::Core, core_league_path(sport, league)?).named("league_info"))
    }

    pub fn athletes(sport: &str, league: &str, query: &AthletesQuery) -> Result<Self> {
        let path = format!("{}/athletes", core_league_path(sport, league)?);
        let mut req = Self::new(EndpointDomain::Core, path)
            .named("athletes")
            .with_query("limit", query.limit)
            .with_query("page", query.page);
        if let Some(team) = &query.team_id {
            req = req.with_query("teams", segment("team_id", team)?);
        }
        Ok(req)
    }
}
