use crate::config::EspnConfig;
use crate::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, RETRY_AFTER};
use reqwest::redirect::Policy;
use std::time::Duration;

// Connection pool defaults shared by both client flavors.
const POOL_MAX_IDLE_PER_HOST: usize = 8;
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const MAX_REDIRECTS: usize = 10;

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Build the pooled async HTTP client described by `config`.
pub fn build_async_client(config: &EspnConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .default_headers(default_headers())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(POOL_IDLE_TIMEOUT))
        .build()
        .map_err(|e| crate::Error::Transport(TransportError::Build(e.to_string())))
}

/// Build the blocking HTTP client described by `config`.
///
/// Must not be called from inside an async runtime; reqwest's blocking
/// client owns its own runtime.
pub fn build_blocking_client(config: &EspnConfig) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .default_headers(default_headers())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(POOL_IDLE_TIMEOUT))
        .build()
        .map_err(|e| crate::Error::Transport(TransportError::Build(e.to_string())))
}

/// Best-effort parsing of `Retry-After`.
///
/// Only the `Retry-After: <seconds>` form is supported; ESPN does not send
/// HTTP dates here.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    if raw.is_empty() {
        return None;
    }
    let secs: u64 = raw.parse().ok()?;
    Some(Duration::from_secs(secs))
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

impl TransportError {
    /// Timeouts, refused connections and interrupted bodies are worth retrying;
    /// a client that cannot be built is not.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Http(e) => !e.is_builder() && !e.is_redirect(),
            TransportError::Build(_) => false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Http(e) if e.is_timeout())
    }
}
