//! Per-identity request throttling.

use assetdesk_core::RateLimitConfig;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Outcome of a rate-limit lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateDecision {
    pub allowed: bool,
    /// Requests still available in the current window.
    pub remaining: u32,
    /// Seconds until the oldest counted request leaves the window.
    pub reset_in_secs: u64,
}

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count a request for `key` if the quota allows it.
    async fn check(&self, key: &str) -> RateDecision;

    /// Report the quota for `key` without counting a request.
    async fn peek(&self, key: &str) -> RateDecision;

    /// Requests allowed per window.
    fn max_requests(&self) -> u32;

    /// Window length.
    fn window(&self) -> Duration;
}

/// In-memory sliding window: at most `max_requests` in any span of
/// `window`, tracked per key.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    max_requests: u32,
    window: Duration,
    requests: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl SlidingWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            requests: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }

    /// Drop timestamps that have left the window.
    fn expire(&self, timestamps: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&oldest) = timestamps.front() {
            if now.duration_since(oldest) >= self.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    fn decide(&self, timestamps: &VecDeque<Instant>, now: Instant, allowed: bool) -> RateDecision {
        let used = u32::try_from(timestamps.len()).unwrap_or(u32::MAX);
        let reset_in_secs = timestamps
            .front()
            .map(|&oldest| ceil_secs((oldest + self.window).saturating_duration_since(now)))
            .unwrap_or(0);

        RateDecision {
            allowed,
            remaining: self.max_requests.saturating_sub(used),
            reset_in_secs,
        }
    }
}

#[async_trait]
impl RateLimiter for SlidingWindowLimiter {
    async fn check(&self, key: &str) -> RateDecision {
        let now = Instant::now();
        let mut requests = self.requests.lock().await;
        let timestamps = requests.entry(key.to_string()).or_default();
        self.expire(timestamps, now);

        let allowed = timestamps.len() < self.max_requests as usize;
        if allowed {
            timestamps.push_back(now);
        }
        self.decide(timestamps, now, allowed)
    }

    async fn peek(&self, key: &str) -> RateDecision {
        let now = Instant::now();
        let mut requests = self.requests.lock().await;

        let Some(timestamps) = requests.get_mut(key) else {
            return RateDecision {
                allowed: self.max_requests > 0,
                remaining: self.max_requests,
                reset_in_secs: 0,
            };
        };
        self.expire(timestamps, now);

        let decision = self.decide(timestamps, now, timestamps.len() < self.max_requests as usize);
        if timestamps.is_empty() {
            requests.remove(key);
        }
        decision
    }

    fn max_requests(&self) -> u32 {
        self.max_requests
    }

    fn window(&self) -> Duration {
        self.window
    }
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}
