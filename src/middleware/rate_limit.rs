//! In-memory sliding-window rate limiter for the auth endpoints.
//! A multi-instance deployment would need a shared backend instead.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct RateLimiter {
    hits: Arc<RwLock<HashMap<String, VecDeque<Instant>>>>,
    max_hits: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_hits: usize, window_secs: u64) -> Self {
        Self {
            hits: Arc::new(RwLock::new(HashMap::new())),
            max_hits,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Record a hit for `key` (an IP, a username, ...) and report whether it
    /// is still inside the window's budget.
    pub async fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.write().await;
        let bucket = hits.entry(key.to_string()).or_default();

        while bucket
            .front()
            .map_or(false, |&t| now.duration_since(t) >= self.window)
        {
            bucket.pop_front();
        }

        if bucket.len() >= self.max_hits {
            return false;
        }
        bucket.push_back(now);
        true
    }

    /// Drop keys whose hits have all aged out.
    pub async fn prune(&self) {
        let now = Instant::now();
        let mut hits = self.hits.write().await;
        hits.retain(|_, bucket| {
            bucket.retain(|&t| now.duration_since(t) < self.window);
            !bucket.is_empty()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blocks_after_budget_is_spent() {
        let limiter = RateLimiter::new(3, 60);

        assert!(limiter.allow("10.0.0.1").await);
        assert!(limiter.allow("10.0.0.1").await);
        assert!(limiter.allow("10.0.0.1").await);
        assert!(!limiter.allow("10.0.0.1").await);

        // Other keys have their own budget.
        assert!(limiter.allow("10.0.0.2").await);
    }

    #[tokio::test]
    async fn window_expiry_frees_the_budget() {
        let limiter = RateLimiter::new(1, 1);

        assert!(limiter.allow("key").await);
        assert!(!limiter.allow("key").await);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(limiter.allow("key").await);
    }

    #[tokio::test]
    async fn prune_drops_stale_keys() {
        let limiter = RateLimiter::new(5, 1);
        limiter.allow("a").await;
        limiter.allow("b").await;

        tokio::time::sleep(Duration::from_secs(2)).await;
        limiter.prune().await;

        let hits = limiter.hits.read().await;
        assert!(hits.is_empty());
    }
}
