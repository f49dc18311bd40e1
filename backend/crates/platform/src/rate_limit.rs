//! Rate Limiting Infrastructure
//!
//! Common rate limiting abstractions plus a process-local in-memory store.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Check and increment rate limit counter
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>>;
}

/// In-memory fixed-window rate limit store
///
/// Process-local, advisory abuse mitigation - not a security boundary.
/// Each key's counter resets when its window expires.
#[derive(Debug, Default)]
pub struct MemoryRateLimitStore {
    entries: Mutex<HashMap<String, WindowEntry>>,
}

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    window_start_ms: i64,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed-window check at an explicit timestamp (testable core)
    fn check_at(&self, key: &str, config: &RateLimitConfig, now_ms: i64) -> RateLimitResult {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        let entry = entries
            .entry(key.to_string())
            .or_insert(WindowEntry {
                count: 0,
                window_start_ms: now_ms,
            });

        if now_ms - entry.window_start_ms >= config.window_ms() {
            entry.count = 0;
            entry.window_start_ms = now_ms;
        }

        entry.count += 1;

        RateLimitResult {
            allowed: entry.count <= config.max_requests,
            remaining: config.max_requests.saturating_sub(entry.count),
            reset_at_ms: entry.window_start_ms + config.window_ms(),
        }
    }
}

impl RateLimitStore for MemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);

        Ok(self.check_at(key, config, now_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_max_requests() {
        let store = MemoryRateLimitStore::new();
        let config = RateLimitConfig::new(3, 900);

        for i in 0..3 {
            let result = store.check_at("1.2.3.4", &config, 1_000);
            assert!(result.allowed, "request {} should be allowed", i + 1);
        }

        let result = store.check_at("1.2.3.4", &config, 1_000);
        assert!(!result.allowed);
        assert_eq!(result.remaining, 0);
    }

    #[test]
    fn test_window_reset() {
        let store = MemoryRateLimitStore::new();
        let config = RateLimitConfig::new(3, 900);

        for _ in 0..4 {
            store.check_at("1.2.3.4", &config, 1_000);
        }
        assert!(!store.check_at("1.2.3.4", &config, 1_000).allowed);

        // Window expired - counter resets
        let result = store.check_at("1.2.3.4", &config, 1_000 + config.window_ms());
        assert!(result.allowed);
        assert_eq!(result.remaining, 2);
    }

    #[test]
    fn test_keys_are_independent() {
        let store = MemoryRateLimitStore::new();
        let config = RateLimitConfig::new(1, 900);

        assert!(store.check_at("1.2.3.4", &config, 1_000).allowed);
        assert!(!store.check_at("1.2.3.4", &config, 1_000).allowed);
        assert!(store.check_at("5.6.7.8", &config, 1_000).allowed);
    }

    #[tokio::test]
    async fn test_check_and_increment() {
        let store = MemoryRateLimitStore::new();
        let config = RateLimitConfig::new(2, 900);

        let result = RateLimitStore::check_and_increment(&store, "k", &config)
            .await
            .unwrap();
        assert!(result.allowed);
        assert_eq!(result.remaining, 1);
    }
}
