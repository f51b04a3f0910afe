use crate::transport::TransportError;
use std::time::Duration;
use thiserror::Error;

/// Where a configuration or validation error points to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "timeout", "events[0].id")
    pub field_path: Option<String>,
    /// What was found instead, e.g. the raw value that failed to parse
    pub details: Option<String>,
    /// Source of the error (e.g., "config", "team_model")
    pub source: Option<String>,
    /// Request URL, when the error came from a request
    pub url: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(self, path: impl Into<String>) -> Self {
        Self {
            field_path: Some(path.into()),
            ..self
        }
    }

    pub fn with_details(self, details: impl Into<String>) -> Self {
        Self {
            details: Some(details.into()),
            ..self
        }
    }

    pub fn with_source(self, source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..self
        }
    }

    pub fn with_url(self, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..self
        }
    }
}

/// Unified error type for the ESPN client.
///
/// Everything that comes back from talking to ESPN (transport failures,
/// non-success statuses, undecodable bodies) is a *client error*; see
/// [`Error::is_client_error`]. Configuration and schema validation problems
/// are reported separately.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("ESPN transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("ESPN resource not found: {url}")]
    NotFound { url: String },

    #[error("ESPN API rate limit exceeded")]
    RateLimited {
        url: String,
        retry_after: Option<Duration>,
    },

    #[error("ESPN {} error: {status}", remote_kind(.status))]
    Remote {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Failed to parse ESPN response: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

fn remote_kind(status: &u16) -> &'static str {
    if *status >= 500 {
        "server"
    } else {
        "API"
    }
}

/// Renders the populated context fields as ` (field: x, url: y)`.
fn format_context(ctx: &ErrorContext) -> String {
    let parts: Vec<String> = [
        ("field", &ctx.field_path),
        ("details", &ctx.details),
        ("source", &ctx.source),
        ("url", &ctx.url),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}: {}", label, v)))
    .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a configuration error naming the offending field.
    pub fn configuration(field: &str, msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
            context: ErrorContext::new()
                .with_field_path(field)
                .with_source("config"),
        }
    }

    /// Configuration error with caller-supplied context.
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Validation error with caller-supplied context.
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Shorthand for a missing required field in an ESPN payload.
    pub fn missing_field(path: impl Into<String>, source: &str) -> Self {
        let path = path.into();
        Error::Validation {
            message: format!("missing required field `{}`", path),
            context: ErrorContext::new()
                .with_field_path(path)
                .with_source(source),
        }
    }

    /// Context of configuration and validation errors.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// HTTP status associated with the error, if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::NotFound { .. } => Some(404),
            Error::RateLimited { .. } => Some(429),
            Error::Remote { status, .. } => Some(*status),
            Error::Transport(TransportError::Http(e)) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for every failure that came from communicating with ESPN.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Transport(_)
                | Error::NotFound { .. }
                | Error::RateLimited { .. }
                | Error::Remote { .. }
                | Error::Decode { .. }
        )
    }

    /// Whether another attempt of the same request may succeed.
    ///
    /// Transport failures (connect, timeout, body read), rate limiting and 5xx
    /// responses are transient. Missing resources, other 4xx responses,
    /// undecodable bodies and local errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(e) => e.is_transient(),
            Error::RateLimited { .. } => true,
            Error::Remote { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The request URL, when the error came from a request.
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::NotFound { url }
            | Error::RateLimited { url, .. }
            | Error::Remote { url, .. }
            | Error::Decode { url, .. } => Some(url),
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                context.url.as_deref()
            }
            _ => None,
        }
    }
}
