//! Client configuration.
//!
//! [`EspnConfig`] is shared by the async and blocking clients. It can be built
//! in code, read from `ESPN_*` environment variables, or loaded from a YAML
//! file. Every client constructor calls [`EspnConfig::validate`].
//!
//! | Variable | Field |
//! |----------|-------|
//! | `ESPN_SITE_API_BASE_URL` | `site_api_base_url` |
//! | `ESPN_CORE_API_BASE_URL` | `core_api_base_url` |
//! | `ESPN_TIMEOUT_SECS` | `timeout` |
//! | `ESPN_MAX_RETRIES` | `max_retries` |
//! | `ESPN_RETRY_BACKOFF_MS` | `retry_backoff` |
//! | `ESPN_MAX_BACKOFF_MS` | `max_backoff` |
//! | `ESPN_USER_AGENT` | `user_agent` |
//! | `ESPN_RATE_LIMIT_REQUESTS` | `rate_limit_requests` |
//! | `ESPN_RATE_LIMIT_PERIOD_SECS` | `rate_limit_period` |

use crate::{Error, ErrorContext, Result};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SITE_API_BASE_URL: &str = "https://site.api.espn.com";
pub const DEFAULT_CORE_API_BASE_URL: &str = "https://sports.core.api.espn.com";

#[derive(Debug, Clone, PartialEq)]
pub struct EspnConfig {
    /// Base URL of the site API (scoreboards, teams, summaries).
    pub site_api_base_url: String,
    /// Base URL of the core API (leagues, athletes).
    pub core_api_base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub retry_backoff: Duration,
    /// Upper bound for a single retry delay.
    pub max_backoff: Duration,
    pub user_agent: String,
    /// Requests allowed per `rate_limit_period`.
    pub rate_limit_requests: u32,
    pub rate_limit_period: Duration,
}

impl Default for EspnConfig {
    fn default() -> Self {
        Self {
            site_api_base_url: DEFAULT_SITE_API_BASE_URL.to_string(),
            core_api_base_url: DEFAULT_CORE_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
            user_agent: format!("espnapi/{}", env!("CARGO_PKG_VERSION")),
            rate_limit_requests: 60,
            rate_limit_period: Duration::from_secs(60),
        }
    }
}

impl EspnConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_site_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.site_api_base_url = url.into();
        self
    }

    pub fn with_core_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.core_api_base_url = url.into();
        self
    }

    /// Point both APIs at the same host (mock servers, proxies).
    pub fn with_base_url(self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.with_site_api_base_url(url.clone())
            .with_core_api_base_url(url)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_rate_limit(mut self, requests: u32, period: Duration) -> Self {
        self.rate_limit_requests = requests;
        self.rate_limit_period = period;
        self
    }

    /// Check every knob; the error names the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.site_api_base_url.trim().is_empty() {
            return Err(Error::configuration(
                "site_api_base_url",
                "site_api_base_url must not be empty",
            ));
        }
        if self.core_api_base_url.trim().is_empty() {
            return Err(Error::configuration(
                "core_api_base_url",
                "core_api_base_url must not be empty",
            ));
        }
        if self.timeout.is_zero() {
            return Err(Error::configuration("timeout", "timeout must be positive"));
        }
        if self.retry_backoff.is_zero() {
            return Err(Error::configuration(
                "retry_backoff",
                "retry_backoff must be positive",
            ));
        }
        if self.max_backoff < self.retry_backoff {
            return Err(Error::configuration(
                "max_backoff",
                "max_backoff must not be smaller than retry_backoff",
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(Error::configuration(
                "user_agent",
                "user_agent must not be empty",
            ));
        }
        if self.rate_limit_requests == 0 {
            return Err(Error::configuration(
                "rate_limit_requests",
                "rate_limit_requests must be positive",
            ));
        }
        if self.rate_limit_period.is_zero() {
            return Err(Error::configuration(
                "rate_limit_period",
                "rate_limit_period must be positive",
            ));
        }
        Ok(())
    }

    /// Defaults overridden by `ESPN_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("ESPN_SITE_API_BASE_URL") {
            config.site_api_base_url = v;
        }
        if let Some(v) = lookup("ESPN_CORE_API_BASE_URL") {
            config.core_api_base_url = v;
        }
        if let Some(secs) = parse_var::<f64>(&lookup, "ESPN_TIMEOUT_SECS")? {
            config.timeout = secs_to_duration("ESPN_TIMEOUT_SECS", secs)?;
        }
        if let Some(n) = parse_var::<u32>(&lookup, "ESPN_MAX_RETRIES")? {
            config.max_retries = n;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "ESPN_RETRY_BACKOFF_MS")? {
            config.retry_backoff = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "ESPN_MAX_BACKOFF_MS")? {
            config.max_backoff = Duration::from_millis(ms);
        }
        if let Some(v) = lookup("ESPN_USER_AGENT") {
            config.user_agent = v;
        }
        if let Some(n) = parse_var::<u32>(&lookup, "ESPN_RATE_LIMIT_REQUESTS")? {
            config.rate_limit_requests = n;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "ESPN_RATE_LIMIT_PERIOD_SECS")? {
            config.rate_limit_period = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document; absent keys keep their defaults.
    ///
    /// ```yaml
    /// site_api_base_url: https://site.api.espn.com
    /// timeout_secs: 10
    /// max_retries: 2
    /// retry_backoff_ms: 250
    /// rate_limit_requests: 30
    /// rate_limit_period_secs: 60
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                "invalid config file",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("config"),
            )
        })?;
        let config = file.into_config()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid value for {}", key),
                ErrorContext::new()
                    .with_field_path(key)
                    .with_details(format!("{:?}: {}", raw, e))
                    .with_source("config"),
            )
        }),
    }
}

fn secs_to_duration(field: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|_| Error::configuration(field, format!("{} must be a non-negative number", field)))
}

/// On-disk shape of the configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    site_api_base_url: Option<String>,
    core_api_base_url: Option<String>,
    timeout_secs: Option<f64>,
    max_retries: Option<u32>,
    retry_backoff_ms: Option<u64>,
    max_backoff_ms: Option<u64>,
    user_agent: Option<String>,
    rate_limit_requests: Option<u32>,
    rate_limit_period_secs: Option<u64>,
}

impl ConfigFile {
    fn into_config(self) -> Result<EspnConfig> {
        let mut config = EspnConfig::default();
        if let Some(v) = self.site_api_base_url {
            config.site_api_base_url = v;
        }
        if let Some(v) = self.core_api_base_url {
            config.core_api_base_url = v;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = secs_to_duration("timeout_secs", secs)?;
        }
        if let Some(v) = self.max_retries {
            config.max_retries = v;
        }
        if let Some(ms) = self.retry_backoff_ms {
            config.retry_backoff = Duration::from_millis(ms);
        }
        if let Some(ms) = self.max_backoff_ms {
            config.max_backoff = Duration::from_millis(ms);
        }
        if let Some(v) = self.user_agent {
            config.user_agent = v;
        }
        if let Some(v) = self.rate_limit_requests {
            config.rate_limit_requests = v;
        }
        if let Some(secs) = self.rate_limit_period_secs {
            config.rate_limit_period = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn field_of(err: &Error) -> Option<&str> {
        err.context().and_then(|c| c.field_path.as_deref())
    }

    #[test]
    fn defaults() {
        let config = EspnConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_backoff, Duration::from_secs(1));
        assert_eq!(config.site_api_base_url, "https://site.api.espn.com");
        assert_eq!(config.core_api_base_url, "https://sports.core.api.espn.com");
        assert!(config.user_agent.starts_with("espnapi/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = EspnConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("timeout must be positive"));
        assert_eq!(field_of(&err), Some("timeout"));
    }

    #[test]
    fn zero_backoff_rejected() {
        let err = EspnConfig::default()
            .with_retry_backoff(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("retry_backoff must be positive"));
    }

    #[test]
    fn max_backoff_below_backoff_rejected() {
        let err = EspnConfig::default()
            .with_retry_backoff(Duration::from_secs(5))
            .with_max_backoff(Duration::from_secs(1))
            .validate()
            .unwrap_err();
        assert_eq!(field_of(&err), Some("max_backoff"));
    }

    #[test]
    fn rate_limit_knobs_rejected() {
        let err = EspnConfig::default()
            .with_rate_limit(0, Duration::from_secs(60))
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("rate_limit_requests must be positive"));

        let err = EspnConfig::default()
            .with_rate_limit(60, Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("rate_limit_period must be positive"));
    }

    #[test]
    fn env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ESPN_SITE_API_BASE_URL", "http://localhost:9000"),
            ("ESPN_TIMEOUT_SECS", "2.5"),
            ("ESPN_MAX_RETRIES", "0"),
            ("ESPN_RETRY_BACKOFF_MS", "20"),
            ("ESPN_RATE_LIMIT_REQUESTS", "5"),
        ]
        .into_iter()
        .collect();
        let config = EspnConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.site_api_base_url, "http://localhost:9000");
        assert_eq!(config.core_api_base_url, DEFAULT_CORE_API_BASE_URL);
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.retry_backoff, Duration::from_millis(20));
        assert_eq!(config.rate_limit_requests, 5);
    }

    #[test]
    fn env_garbage_is_an_error() {
        let err = EspnConfig::from_lookup(|k| {
            (k == "ESPN_MAX_RETRIES").then(|| "lots".to_string())
        })
        .unwrap_err();
        assert_eq!(field_of(&err), Some("ESPN_MAX_RETRIES"));
    }

    #[test]
    fn env_values_are_validated() {
        let err = EspnConfig::from_lookup(|k| {
            (k == "ESPN_TIMEOUT_SECS").then(|| "0".to_string())
        })
        .unwrap_err();
        assert_eq!(field_of(&err), Some("timeout"));
    }

    #[test]
    fn yaml_partial_document() {
        let config = EspnConfig::from_yaml_str(
            "timeout_secs: 10\nmax_retries: 1\nretry_backoff_ms: 250\n",
        )
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.retry_backoff, Duration::from_millis(250));
        assert_eq!(config.rate_limit_requests, 60);
    }

    #[test]
    fn yaml_unknown_key_rejected() {
        let err = EspnConfig::from_yaml_str("timeout: 10\n").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn yaml_missing_file_is_io_error() {
        let err = EspnConfig::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
