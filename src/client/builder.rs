use crate::client::blocking::BlockingEspnClient;
use crate::client::core::EspnClient;
use crate::config::EspnConfig;
use crate::resilience::rate_limiter::{RateLimiter, RateLimiterConfig};
use crate::resilience::retry::RetryPolicy;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

/// Builder for clients with custom configuration.
///
/// Both client flavours come out of the same builder, so an async and a
/// blocking client can share one rate limiter:
///
/// ```rust
/// use espnapi::{EspnClientBuilder, RateLimiter, RateLimiterConfig};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let limiter = Arc::new(RateLimiter::new(
///     RateLimiterConfig::from_window(30, Duration::from_secs(60)).unwrap(),
/// ));
/// let client = EspnClientBuilder::new()
///     .timeout(Duration::from_secs(5))
///     .rate_limiter(limiter.clone())
///     .build()
///     .unwrap();
/// assert_eq!(client.config().timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Default)]
pub struct EspnClientBuilder {
    config: EspnConfig,
    rate_limiter: Option<Arc<RateLimiter>>,
    retry: Option<RetryPolicy>,
}

impl EspnClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: EspnConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Start from `EspnConfig::from_env()`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(EspnConfig::from_env()?))
    }

    /// Point both ESPN hosts at one base URL.
    ///
    /// Primarily for testing with mock servers.
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.config = self.config.with_base_url(base_url);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config = self.config.with_max_retries(max_retries);
        self
    }

    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.config = self.config.with_retry_backoff(backoff);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config = self.config.with_user_agent(user_agent);
        self
    }

    /// Share an existing limiter instead of building one from the config.
    pub fn rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Disable client-side throttling.
    pub fn unthrottled(mut self) -> Self {
        self.rate_limiter = Some(Arc::new(RateLimiter::unlimited()));
        self
    }

    /// Replace the retry policy derived from the config.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn build(self) -> Result<EspnClient> {
        Ok(EspnClient::from_parts(self.into_parts()?))
    }

    /// Must not be called from within an async runtime; the blocking
    /// transport starts its own.
    pub fn build_blocking(self) -> Result<BlockingEspnClient> {
        Ok(BlockingEspnClient::from_parts(self.into_parts()?))
    }

    fn into_parts(self) -> Result<ClientParts> {
        self.config.validate()?;
        let mut parts = ClientParts::new(self.config);
        if let Some(limiter) = self.rate_limiter {
            parts.rate_limiter = limiter;
        }
        if let Some(retry) = self.retry {
            parts.retry = retry;
        }
        Ok(parts)
    }
}

/// State both clients are built from.
#[derive(Debug)]
pub(crate) struct ClientParts {
    pub config: EspnConfig,
    pub retry: RetryPolicy,
    pub rate_limiter: Arc<RateLimiter>,
}

impl ClientParts {
    /// No validation; callers validate or pass a known-good config.
    pub fn new(config: EspnConfig) -> Self {
        let rate_limiter = match RateLimiterConfig::from_config(&config) {
            Some(cfg) => RateLimiter::new(cfg),
            None => RateLimiter::unlimited(),
        };
        Self {
            retry: RetryPolicy::from_config(&config),
            rate_limiter: Arc::new(rate_limiter),
            config,
        }
    }
}
