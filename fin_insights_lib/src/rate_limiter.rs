//! Sliding-window request budget for Alpha Vantage.
//!
//! The free tier allows a handful of calls per minute. Requests never wait
//! for a slot: when the window is full the quote path skips Alpha Vantage and
//! goes straight to the fallback providers.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Sliding-window rate limiter.
///
/// Tracks timestamps of recent requests in a `VecDeque` behind a tokio Mutex.
pub struct RateLimiter {
    timestamps: Mutex<VecDeque<Instant>>,
    max_requests: u64,
    window_duration: Duration,
}

impl RateLimiter {
    /// Create a rate limiter with explicit budget and window.
    pub fn new(max_requests: u64, window_duration: Duration) -> Self {
        Self {
            timestamps: Mutex::new(VecDeque::with_capacity(max_requests as usize)),
            max_requests,
            window_duration,
        }
    }

    /// `max_requests` per rolling minute.
    pub fn per_minute(max_requests: u64) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }

    fn evict(ts: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while ts
            .front()
            .is_some_and(|&t| now.saturating_duration_since(t) >= window)
        {
            ts.pop_front();
        }
    }

    /// Records a request if the window has room. Returns `false` without
    /// waiting when the budget is spent.
    pub async fn try_acquire(&self) -> bool {
        let now = Instant::now();
        let mut ts = self.timestamps.lock().await;
        Self::evict(&mut ts, now, self.window_duration);
        if (ts.len() as u64) < self.max_requests {
            ts.push_back(now);
            true
        } else {
            false
        }
    }

    /// Non-blocking snapshot of remaining request budget in the current window.
    ///
    /// Returns `None` if the lock is contended.
    pub fn remaining_budget(&self) -> Option<u64> {
        let ts = self.timestamps.try_lock().ok()?;
        let now = Instant::now();
        let active = ts
            .iter()
            .filter(|&&t| now.saturating_duration_since(t) < self.window_duration)
            .count() as u64;
        Some(self.max_requests.saturating_sub(active))
    }

    pub fn max_requests(&self) -> u64 {
        self.max_requests
    }
}
