//! Request pacing for the remote APIs
//!
//! Each external service enforces its own limit, so each client owner keeps
//! its own limiter instance; nothing is shared between services.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// How many requests may be issued within a trailing time window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Requests admitted per window
    pub requests_per_window: u32,
    /// Length of the trailing window
    pub window: Duration,
}

impl RateLimitPolicy {
    /// `n` requests per second
    pub const fn per_second(n: u32) -> Self {
        Self {
            requests_per_window: n,
            window: Duration::from_secs(1),
        }
    }
}

/// Sliding-window rate limiter.
///
/// [`acquire`](Self::acquire) suspends until one more request fits inside
/// the policy's trailing window, then records it. Requests that stopped
/// counting against the window are forgotten, so an idle limiter admits a
/// fresh burst immediately.
pub struct RateLimiter {
    policy: RateLimitPolicy,
    issued: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter enforcing `policy`
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            issued: Mutex::new(VecDeque::new()),
        }
    }

    /// The policy this limiter enforces
    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Wait until issuing one more request stays within the policy, then
    /// record the request.
    pub async fn acquire(&self) {
        loop {
            let now = Instant::now();
            let mut issued = self.issued.lock().await;
            while issued
                .front()
                .map_or(false, |t| now.duration_since(*t) >= self.policy.window)
            {
                issued.pop_front();
            }
            if (issued.len() as u32) < self.policy.requests_per_window {
                issued.push_back(now);
                return;
            }
            // Window full: a slot opens when the oldest tracked request
            // leaves it.
            let oldest = match issued.front() {
                Some(t) => *t,
                None => return,
            };
            drop(issued);
            let wake = oldest + self.policy.window;
            tracing::debug!("rate limit reached, waiting {:?}", wake.duration_since(now));
            sleep_until(wake).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn one_per_second_spaces_requests() {
        let limiter = RateLimiter::new(RateLimitPolicy::per_second(1));
        let start = Instant::now();

        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(10));

        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(1));

        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn burst_fits_inside_window() {
        let limiter = RateLimiter::new(RateLimitPolicy {
            requests_per_window: 3,
            window: Duration::from_secs(1),
        });
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(10));

        // Fourth request waits for the first slot to leave the window.
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_limiter_admits_immediately() {
        let limiter = RateLimiter::new(RateLimitPolicy::per_second(1));
        limiter.acquire().await;

        tokio::time::sleep(Duration::from_secs(5)).await;

        let before = Instant::now();
        limiter.acquire().await;
        assert!(before.elapsed() < Duration::from_millis(10));
    }
}
