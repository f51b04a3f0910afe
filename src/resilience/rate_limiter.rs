use crate::config::EspnConfig;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Point-in-time view of a limiter, for logs and tests.
#[derive(Debug, Clone)]
pub struct RateLimiterSnapshot {
    pub rps: f64,
    pub burst: f64,
    pub tokens: f64,
    /// How long the next caller would wait, if it would wait at all.
    pub estimated_wait_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateLimiterConfig {
    /// Tokens per second.
    pub rps: f64,
    /// Bucket capacity.
    pub burst: f64,
}

impl RateLimiterConfig {
    /// `rps` tokens per second; the bucket holds one second of tokens (at least one).
    pub fn from_rps(rps: f64) -> Option<Self> {
        (rps.is_finite() && rps >= 0.0).then(|| Self {
            rps,
            burst: rps.max(1.0),
        })
    }

    /// `requests` per `period`, with the whole window available as burst.
    pub fn from_window(requests: u32, period: Duration) -> Option<Self> {
        if requests == 0 || period.is_zero() {
            return None;
        }
        Some(Self {
            rps: f64::from(requests) / period.as_secs_f64(),
            burst: f64::from(requests),
        })
    }

    pub fn from_config(config: &EspnConfig) -> Option<Self> {
        Self::from_window(config.rate_limit_requests, config.rate_limit_period)
    }

    /// Override the bucket capacity.
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.burst = f64::from(tokens);
        self
    }
}

#[derive(Debug)]
struct State {
    tokens: f64,
    last: Instant,
    /// Set after a 429 carrying `Retry-After`.
    blocked_until: Option<Instant>,
}

/// Time to refill `missing` tokens, saturating for rates too slow to represent.
fn refill_wait(missing: f64, rps: f64) -> Duration {
    Duration::try_from_secs_f64(missing / rps).unwrap_or(Duration::MAX)
}

impl State {
    fn refill(&mut self, cfg: &RateLimiterConfig, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last).as_secs_f64();
        self.tokens = (self.tokens + elapsed * cfg.rps).min(cfg.burst);
        self.last = now;
    }
}

/// Client-side token bucket shared by every request of one client.
///
/// The lock is never held across a sleep or an await, so the same limiter
/// serves the async client ([`RateLimiter::acquire`]) and the blocking one
/// ([`RateLimiter::acquire_blocking`]). A zero rate means unlimited.
#[derive(Debug)]
pub struct RateLimiter {
    cfg: RateLimiterConfig,
    state: Mutex<State>,
}

impl RateLimiter {
    pub fn new(cfg: RateLimiterConfig) -> Self {
        let state = Mutex::new(State {
            tokens: cfg.burst,
            last: Instant::now(),
            blocked_until: None,
        });
        Self { cfg, state }
    }

    /// Limiter that never waits.
    pub fn unlimited() -> Self {
        Self::new(RateLimiterConfig { rps: 0.0, burst: 0.0 })
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // State stays consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Take a token, or report how long to wait before asking again.
    fn reserve(&self) -> Option<Duration> {
        let cfg = &self.cfg;
        let mut st = self.lock();
        let now = Instant::now();

        if let Some(until) = st.blocked_until {
            if until > now {
                return Some(until.duration_since(now));
            }
            st.blocked_until = None;
        }

        if cfg.rps <= 0.0 {
            return None;
        }

        st.refill(cfg, now);
        if st.tokens >= 1.0 {
            st.tokens -= 1.0;
            return None;
        }

        Some(refill_wait(1.0 - st.tokens, cfg.rps))
    }

    /// Acquire one token, sleeping on the tokio timer while the bucket is empty.
    pub async fn acquire(&self) {
        while let Some(wait) = self.reserve() {
            tokio::time::sleep(wait).await;
        }
    }

    /// Acquire one token, parking the current thread while the bucket is empty.
    pub fn acquire_blocking(&self) {
        while let Some(wait) = self.reserve() {
            std::thread::sleep(wait);
        }
    }

    /// Take a token only if one is available right now.
    pub fn try_acquire(&self) -> bool {
        self.reserve().is_none()
    }

    /// Hold every caller back for `duration` (server-side backoff hint).
    pub fn block_for(&self, duration: Duration) {
        let mut st = self.lock();
        let Some(until) = Instant::now().checked_add(duration) else {
            return;
        };
        st.blocked_until = Some(st.blocked_until.map_or(until, |prev| prev.max(until)));
    }

    pub fn snapshot(&self) -> RateLimiterSnapshot {
        let cfg = &self.cfg;
        let mut st = self.lock();
        let now = Instant::now();

        let blocked = st
            .blocked_until
            .filter(|until| *until > now)
            .map(|until| until - now);
        let refill = if cfg.rps > 0.0 {
            st.refill(cfg, now);
            (st.tokens < 1.0).then(|| refill_wait(1.0 - st.tokens, cfg.rps))
        } else {
            None
        };
        let wait = match (blocked, refill) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };

        RateLimiterSnapshot {
            rps: cfg.rps,
            burst: cfg.burst,
            tokens: st.tokens,
            estimated_wait_ms: wait.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_rps() {
        let config = RateLimiterConfig::from_rps(10.0).unwrap();
        assert_eq!(config.rps, 10.0);
        assert_eq!(config.burst, 10.0);

        let config = RateLimiterConfig::from_rps(0.5).unwrap();
        assert_eq!(config.burst, 1.0);

        assert!(RateLimiterConfig::from_rps(-1.0).is_none());
        assert!(RateLimiterConfig::from_rps(f64::NAN).is_none());
        assert!(RateLimiterConfig::from_rps(f64::INFINITY).is_none());
    }

    #[test]
    fn config_from_window() {
        let config = RateLimiterConfig::from_window(60, Duration::from_secs(60)).unwrap();
        assert_eq!(config.rps, 1.0);
        assert_eq!(config.burst, 60.0);
        assert!(RateLimiterConfig::from_window(0, Duration::from_secs(1)).is_none());
        assert!(RateLimiterConfig::from_window(1, Duration::ZERO).is_none());
    }

    #[test]
    fn config_from_client_config() {
        let cfg = EspnConfig::default().with_rate_limit(30, Duration::from_secs(10));
        let config = RateLimiterConfig::from_config(&cfg).unwrap();
        assert_eq!(config.rps, 3.0);
        assert_eq!(config.burst, 30.0);
    }

    #[test]
    fn try_acquire_drains_burst() {
        let limiter = RateLimiter::new(
            RateLimiterConfig::from_rps(1.0)
                .unwrap()
                .with_max_tokens(3),
        );
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
        assert!(limiter.snapshot().estimated_wait_ms.is_some());
    }

    #[test]
    fn very_long_window_saturates_wait() {
        let cfg = EspnConfig::default().with_rate_limit(1, Duration::from_secs(u64::MAX));
        assert!(cfg.validate().is_ok());
        let limiter = RateLimiter::new(RateLimiterConfig::from_config(&cfg).unwrap());

        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
        assert_eq!(limiter.snapshot().estimated_wait_ms, Some(u64::MAX));
    }

    #[test]
    fn unlimited_never_blocks() {
        let limiter = RateLimiter::unlimited();
        for _ in 0..1000 {
            assert!(limiter.try_acquire());
        }
    }

    #[test]
    fn blocking_acquire_refills() {
        let limiter = RateLimiter::new(
            RateLimiterConfig::from_rps(100.0)
                .unwrap()
                .with_max_tokens(1),
        );
        let start = Instant::now();
        limiter.acquire_blocking();
        limiter.acquire_blocking();
        // Second token needs ~10ms of refill.
        assert!(start.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn block_for_holds_callers_back() {
        let limiter = RateLimiter::unlimited();
        limiter.block_for(Duration::from_millis(50));
        assert!(!limiter.try_acquire());
        let wait = limiter.snapshot().estimated_wait_ms.unwrap();
        assert!(wait <= 50);
        std::thread::sleep(Duration::from_millis(60));
        assert!(limiter.try_acquire());
    }

    #[tokio::test]
    async fn async_acquire_within_burst() {
        let limiter = RateLimiter::new(RateLimiterConfig::from_rps(100.0).unwrap());
        for _ in 0..10 {
            limiter.acquire().await;
        }
        let snapshot = limiter.snapshot();
        assert_eq!(snapshot.burst, 100.0);
        assert!(snapshot.tokens < 100.0);
    }

    #[test]
    fn async_acquire_waits_out_block() {
        let limiter = RateLimiter::unlimited();
        limiter.block_for(Duration::from_millis(20));
        let start = Instant::now();
        tokio_test::block_on(limiter.acquire());
        assert!(start.elapsed() >= Duration::from_millis(15));
        assert!(limiter.try_acquire());
    }
}
