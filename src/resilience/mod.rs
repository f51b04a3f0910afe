//! Resilience primitives shared by both clients.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`retry`] | Retry policy with capped exponential backoff |
//! | [`rate_limiter`] | Token bucket throttling outgoing requests |
//!
//! ```rust
//! use espnapi::resilience::retry::RetryPolicy;
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::new(3, Duration::from_millis(100), Duration::from_secs(1));
//! assert_eq!(policy.max_attempts(), 4);
//! assert_eq!(policy.backoff(3), Duration::from_millis(400));
//! ```

pub mod rate_limiter;
pub mod retry;

pub use rate_limiter::{RateLimiter, RateLimiterConfig, RateLimiterSnapshot};
pub use retry::RetryPolicy;
