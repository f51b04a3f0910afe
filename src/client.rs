//! ESPN clients.
//!
//! [`EspnClient`] (async) and [`BlockingEspnClient`] share request
//! construction ([`endpoint`]), status handling and the response wrapper
//! ([`response`]), and the retry and rate limiting policies.

pub mod blocking;
pub mod builder;
pub mod core;
pub mod endpoint;
pub mod response;

pub use blocking::{default_blocking_client, BlockingEspnClient};
pub use builder::EspnClientBuilder;
pub use core::{default_client, EspnClient};
pub use endpoint::{
    build_url, ApiRequest, AthletesQuery, EndpointDomain, ScoreboardDate, ScoreboardQuery,
};
pub use response::EspnResponse;
