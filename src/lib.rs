//! # espnapi
//!
//! Typed client for ESPN's public sports-data API.
//!
//! ## Overview
//!
//! The crate wraps the two ESPN hosts (the *site* API serving scoreboards,
//! teams, game summaries and news, and the *core* API serving league and
//! athlete resources) behind an async client and a blocking client that share
//! one configuration, one request-construction layer and one set of models.
//!
//! ## Key Features
//!
//! - **Two clients**: [`EspnClient`] (tokio) and [`BlockingEspnClient`]
//! - **Retries**: transient failures are retried with capped exponential backoff
//! - **Rate limiting**: a client-side token bucket that also honours `Retry-After`
//! - **Typed models**: [`models::Team`], [`models::Event`], [`models::Athlete`], ...
//!   validated on parse
//! - **Configuration**: defaults, `ESPN_*` environment variables or a YAML file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use espnapi::{EspnClient, ScoreboardQuery};
//!
//! #[tokio::main]
//! async fn main() -> espnapi::Result<()> {
//!     let client = EspnClient::from_env()?;
//!
//!     for team in client.list_teams("basketball", "nba").await? {
//!         println!("{} -> {:?}", team, team.primary_logo());
//!     }
//!
//!     let response = client
//!         .get_scoreboard("football", "nfl", &ScoreboardQuery::new().date("20240107"))
//!         .await?;
//!     let events = response.get("events").and_then(|e| e.as_array());
//!     println!("{} events", events.map_or(0, Vec::len));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Async and blocking clients, endpoints, response wrapper |
//! | [`config`] | Client configuration |
//! | [`models`] | Typed ESPN entities |
//! | [`resilience`] | Retry policy and rate limiter |
//! | [`transport`] | HTTP client construction |
//! | [`utils`] | Lenient JSON helpers |

pub mod client;
pub mod config;
pub mod models;
pub mod resilience;
pub mod transport;
pub mod utils;

// Re-export main types for convenience
pub use client::{
    default_blocking_client, default_client, ApiRequest, AthletesQuery, BlockingEspnClient,
    EndpointDomain, EspnClient, EspnClientBuilder, EspnResponse, ScoreboardDate, ScoreboardQuery,
};
pub use config::EspnConfig;
pub use models::{Athlete, Competitor, Event, EventStatus, League, Sport, Team, Venue};
pub use resilience::{RateLimiter, RateLimiterConfig, RetryPolicy};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
