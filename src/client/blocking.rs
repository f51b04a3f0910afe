//! Synchronous ESPN client.
//!
//! Mirrors [`crate::EspnClient`] on top of `reqwest::blocking`. The blocking
//! transport runs its own runtime internally, so this client must not be
//! created, used or dropped from inside an async context.

use crate::client::builder::{ClientParts, EspnClientBuilder};
use crate::client::endpoint::{
    ApiRequest, AthletesQuery, EndpointDomain, ScoreboardQuery, DEFAULT_TEAMS_LIMIT,
};
use crate::client::response::{handle_response, EspnResponse};
use crate::config::EspnConfig;
use crate::models::{Athlete, Event, League, Team};
use crate::resilience::rate_limiter::RateLimiter;
use crate::resilience::retry::RetryPolicy;
use crate::transport::{build_blocking_client, retry_after, TransportError};
use crate::{Error, Result};
use arc_swap::ArcSwapOption;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug)]
pub struct BlockingEspnClient {
    config: EspnConfig,
    retry: RetryPolicy,
    rate_limiter: Arc<RateLimiter>,
    http: ArcSwapOption<reqwest::blocking::Client>,
}

impl BlockingEspnClient {
    pub fn new(config: EspnConfig) -> Result<Self> {
        EspnClientBuilder::from_config(config).build_blocking()
    }

    pub fn from_env() -> Result<Self> {
        EspnClientBuilder::from_env()?.build_blocking()
    }

    pub(crate) fn from_parts(parts: ClientParts) -> Self {
        Self {
            config: parts.config,
            retry: parts.retry,
            rate_limiter: parts.rate_limiter,
            http: ArcSwapOption::empty(),
        }
    }

    pub fn config(&self) -> &EspnConfig {
        &self.config
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    pub fn is_open(&self) -> bool {
        self.http.load().is_some()
    }

    pub fn close(&self) {
        if self.http.swap(None).is_some() {
            debug!("espn_client_closed");
        }
    }

    fn http(&self) -> Result<Arc<reqwest::blocking::Client>> {
        if let Some(client) = self.http.load_full() {
            return Ok(client);
        }
        let client = Arc::new(build_blocking_client(&self.config)?);
        self.http.store(Some(client.clone()));
        debug!(timeout_ms = self.config.timeout.as_millis() as u64, "espn_client_created");
        Ok(client)
    }

    pub fn get(
        &self,
        path: &str,
        domain: EndpointDomain,
        params: &[(&str, &str)],
    ) -> Result<EspnResponse> {
        let request = params
            .iter()
            .fold(ApiRequest::new(domain, path), |req, (k, v)| {
                req.with_query(*k, v)
            });
        self.execute(&request)
    }

    pub fn execute(&self, request: &ApiRequest) -> Result<EspnResponse> {
        let url = request.url(&self.config);
        let request_id = Uuid::new_v4().to_string();
        self.retry.run_blocking(request.operation, |attempt| {
            self.execute_once(&url, &request.query, attempt, &request_id)
        })
    }

    fn execute_once(
        &self,
        url: &str,
        query: &[(String, String)],
        attempt: u32,
        request_id: &str,
    ) -> Result<EspnResponse> {
        self.rate_limiter.acquire_blocking();
        let client = self.http()?;
        debug!(request_id, url, attempt, params = ?query, "espn_request");

        let mut builder = client.get(url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let response = builder.send().map_err(TransportError::Http)?;
        let status = response.status().as_u16();
        let retry_after = retry_after(response.headers());
        let body = response.text().map_err(TransportError::Http)?;

        let result = handle_response(status, url, retry_after, &body);
        if let Err(Error::RateLimited {
            retry_after: Some(hint),
            ..
        }) = &result
        {
            self.rate_limiter
                .block_for((*hint).min(self.retry.max_delay));
        }
        result
    }

    pub fn get_scoreboard(
        &self,
        sport: &str,
        league: &str,
        query: &ScoreboardQuery,
    ) -> Result<EspnResponse> {
        let request = ApiRequest::scoreboard(sport, league, query)?;
        info!(sport, league, params = ?request.query, "fetching_scoreboard");
        self.execute(&request)
    }

    pub fn get_teams(&self, sport: &str, league: &str, limit: Option<u32>) -> Result<EspnResponse> {
        let request = ApiRequest::teams(sport, league, limit.unwrap_or(DEFAULT_TEAMS_LIMIT))?;
        info!(sport, league, "fetching_teams");
        self.execute(&request)
    }

    pub fn get_team(&self, sport: &str, league: &str, team_id: &str) -> Result<EspnResponse> {
        let request = ApiRequest::team(sport, league, team_id)?;
        info!(sport, league, team_id, "fetching_team");
        self.execute(&request)
    }

    pub fn get_event(&self, sport: &str, league: &str, event_id: &str) -> Result<EspnResponse> {
        let request = ApiRequest::event(sport, league, event_id)?;
        info!(sport, league, event_id, "fetching_event");
        self.execute(&request)
    }

    pub fn get_news(&self, sport: &str, league: &str, limit: Option<u32>) -> Result<EspnResponse> {
        let request = ApiRequest::news(sport, league, limit)?;
        info!(sport, league, "fetching_news");
        self.execute(&request)
    }

    pub fn get_league_info(&self, sport: &str, league: &str) -> Result<EspnResponse> {
        let request = ApiRequest::league_info(sport, league)?;
        info!(sport, league, "fetching_league_info");
        self.execute(&request)
    }

    pub fn get_athletes(
        &self,
        sport: &str,
        league: &str,
        query: &AthletesQuery,
    ) -> Result<EspnResponse> {
        let request = ApiRequest::athletes(sport, league, query)?;
        info!(
            sport,
            league,
            team_id = query.team_id.as_deref(),
            page = query.page,
            "fetching_athletes"
        );
        self.execute(&request)
    }

    pub fn scoreboard_events(
        &self,
        sport: &str,
        league: &str,
        query: &ScoreboardQuery,
    ) -> Result<Vec<Event>> {
        self.get_scoreboard(sport, league, query)?
            .events(&League::resolve(sport, league))
    }

    pub fn list_teams(&self, sport: &str, league: &str) -> Result<Vec<Team>> {
        self.get_teams(sport, league, None)?
            .teams(&League::resolve(sport, league))
    }

    pub fn team_details(&self, sport: &str, league: &str, team_id: &str) -> Result<Team> {
        self.get_team(sport, league, team_id)?
            .team(&League::resolve(sport, league))
    }

    pub fn event_details(&self, sport: &str, league: &str, event_id: &str) -> Result<Event> {
        self.get_event(sport, league, event_id)?
            .event_summary(&League::resolve(sport, league))
    }

    pub fn league_details(&self, sport: &str, league: &str) -> Result<League> {
        let resolved = League::resolve(sport, league);
        self.get_league_info(sport, league)?.league(&resolved.sport)
    }

    pub fn list_athletes(
        &self,
        sport: &str,
        league: &str,
        query: &AthletesQuery,
    ) -> Result<Vec<Athlete>> {
        self.get_athletes(sport, league, query)?.athletes(None)
    }
}

impl Default for BlockingEspnClient {
    fn default() -> Self {
        Self::from_parts(ClientParts::new(EspnConfig::default()))
    }
}

static DEFAULT_BLOCKING_CLIENT: OnceCell<Arc<BlockingEspnClient>> = OnceCell::new();

/// Process-wide blocking client with the default configuration.
pub fn default_blocking_client() -> Arc<BlockingEspnClient> {
    DEFAULT_BLOCKING_CLIENT
        .get_or_init(|| Arc::new(BlockingEspnClient::default()))
        .clone()
}
