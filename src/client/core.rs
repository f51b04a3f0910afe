use crate::client::builder::{ClientParts, EspnClientBuilder};
use crate::client::endpoint::{
    ApiRequest, AthletesQuery, EndpointDomain, ScoreboardQuery, DEFAULT_TEAMS_LIMIT,
};
use crate::client::response::{handle_response, EspnResponse};
use crate::config::EspnConfig;
use crate::models::{Athlete, Event, League, Team};
use crate::resilience::rate_limiter::RateLimiter;
use crate::resilience::retry::RetryPolicy;
use crate::transport::{build_async_client, retry_after, TransportError};
use crate::{Error, Result};
use arc_swap::ArcSwapOption;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Asynchronous ESPN client.
///
/// The underlying `reqwest::Client` is created on first use and reused for
/// every request; [`EspnClient::close`] drops it and the next request builds a
/// fresh one. Methods take `&self` and return `Send` futures, so one client
/// can be shared across tasks behind an `Arc`.
///
/// ```no_run
/// # async fn run() -> espnapi::Result<()> {
/// use espnapi::{EspnClient, ScoreboardQuery};
///
/// let client = EspnClient::new(Default::default())?;
/// let events = client
///     .scoreboard_events("basketball", "nba", &ScoreboardQuery::new())
///     .await?;
/// for event in &events {
///     println!("{} - {}", event, event.display_status());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EspnClient {
    config: EspnConfig,
    retry: RetryPolicy,
    rate_limiter: Arc<RateLimiter>,
    http: ArcSwapOption<reqwest::Client>,
}

impl EspnClient {
    /// Validate `config` and create a client.
    pub fn new(config: EspnConfig) -> Result<Self> {
        EspnClientBuilder::from_config(config).build()
    }

    /// Client configured from `ESPN_*` environment variables.
    pub fn from_env() -> Result<Self> {
        EspnClientBuilder::from_env()?.build()
    }

    pub fn builder() -> EspnClientBuilder {
        EspnClientBuilder::new()
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

    /// Whether an HTTP client is currently held.
    pub fn is_open(&self) -> bool {
        self.http.load().is_some()
    }

    /// Drop the HTTP client and its connection pool.
    pub fn close(&self) {
        if self.http.swap(None).is_some() {
            debug!("espn_client_closed");
        }
    }

    fn http(&self) -> Result<Arc<reqwest::Client>> {
        if let Some(client) = self.http.load_full() {
            return Ok(client);
        }
        let client = Arc::new(build_async_client(&self.config)?);
        self.http.store(Some(client.clone()));
        debug!(timeout_ms = self.config.timeout.as_millis() as u64, "espn_client_created");
        Ok(client)
    }

    /// GET `path` on `domain` with query `params`.
    pub async fn get(
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
        self.execute(&request).await
    }

    /// Send `request`, retrying transient failures per the retry policy.
    pub async fn execute(&self, request: &ApiRequest) -> Result<EspnResponse> {
        let url = request.url(&self.config);
        let request_id = Uuid::new_v4().to_string();
        self.retry
            .run(request.operation, |attempt| {
                self.execute_once(&url, &request.query, attempt, &request_id)
            })
            .await
    }

    async fn execute_once(
        &self,
        url: &str,
        query: &[(String, String)],
        attempt: u32,
        request_id: &str,
    ) -> Result<EspnResponse> {
        self.rate_limiter.acquire().await;
        let client = self.http()?;
        debug!(request_id, url, attempt, params = ?query, "espn_request");

        let mut builder = client.get(url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let response = builder.send().await.map_err(TransportError::Http)?;
        let status = response.status().as_u16();
        let retry_after = retry_after(response.headers());
        let body = response.text().await.map_err(TransportError::Http)?;

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

    pub async fn get_scoreboard(
        &self,
        sport: &str,
        league: &str,
        query: &ScoreboardQuery,
    ) -> Result<EspnResponse> {
        let request = ApiRequest::scoreboard(sport, league, query)?;
        info!(sport, league, params = ?request.query, "fetching_scoreboard");
        self.execute(&request).await
    }

    /// Teams of a league; `limit` defaults to 100.
    pub async fn get_teams(
        &self,
        sport: &str,
        league: &str,
        limit: Option<u32>,
    ) -> Result<EspnResponse> {
        let request = ApiRequest::teams(sport, league, limit.unwrap_or(DEFAULT_TEAMS_LIMIT))?;
        info!(sport, league, "fetching_teams");
        self.execute(&request).await
    }

    pub async fn get_team(&self, sport: &str, league: &str, team_id: &str) -> Result<EspnResponse> {
        let request = ApiRequest::team(sport, league, team_id)?;
        info!(sport, league, team_id, "fetching_team");
        self.execute(&request).await
    }

    /// Game summary of one event.
    pub async fn get_event(
        &self,
        sport: &str,
        league: &str,
        event_id: &str,
    ) -> Result<EspnResponse> {
        let request = ApiRequest::event(sport, league, event_id)?;
        info!(sport, league, event_id, "fetching_event");
        self.execute(&request).await
    }

    pub async fn get_news(
        &self,
        sport: &str,
        league: &str,
        limit: Option<u32>,
    ) -> Result<EspnResponse> {
        let request = ApiRequest::news(sport, league, limit)?;
        info!(sport, league, "fetching_news");
        self.execute(&request).await
    }

    pub async fn get_league_info(&self, sport: &str, league: &str) -> Result<EspnResponse> {
        let request = ApiRequest::league_info(sport, league)?;
        info!(sport, league, "fetching_league_info");
        self.execute(&request).await
    }

    pub async fn get_athletes(
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
        self.execute(&request).await
    }

    pub async fn scoreboard_events(
        &self,
        sport: &str,
        league: &str,
        query: &ScoreboardQuery,
    ) -> Result<Vec<Event>> {
        self.get_scoreboard(sport, league, query)
            .await?
            .events(&League::resolve(sport, league))
    }

    pub async fn list_teams(&self, sport: &str, league: &str) -> Result<Vec<Team>> {
        self.get_teams(sport, league, None)
            .await?
            .teams(&League::resolve(sport, league))
    }

    pub async fn team_details(&self, sport: &str, league: &str, team_id: &str) -> Result<Team> {
        self.get_team(sport, league, team_id)
            .await?
            .team(&League::resolve(sport, league))
    }

    pub async fn event_details(&self, sport: &str, league: &str, event_id: &str) -> Result<Event> {
        self.get_event(sport, league, event_id)
            .await?
            .event_summary(&League::resolve(sport, league))
    }

    pub async fn league_details(&self, sport: &str, league: &str) -> Result<League> {
        let resolved = League::resolve(sport, league);
        self.get_league_info(sport, league)
            .await?
            .league(&resolved.sport)
    }

    /// Athletes embedded in the listing; core API pages that only carry
    /// `$ref` links yield an empty list (see [`EspnResponse::athlete_refs`]).
    pub async fn list_athletes(
        &self,
        sport: &str,
        league: &str,
        query: &AthletesQuery,
    ) -> Result<Vec<Athlete>> {
        self.get_athletes(sport, league, query).await?.athletes(None)
    }
}

impl Default for EspnClient {
    fn default() -> Self {
        Self::from_parts(ClientParts::new(EspnConfig::default()))
    }
}

static DEFAULT_CLIENT: Lazy<Arc<EspnClient>> = Lazy::new(|| Arc::new(EspnClient::default()));

/// Process-wide client with the default configuration.
pub fn default_client() -> Arc<EspnClient> {
    DEFAULT_CLIENT.clone()
}
