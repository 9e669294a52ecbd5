//! Rate limiter for login attempts

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Login attempts allowed inside one window
    pub max_attempts: u32,
    /// Time window in seconds
    pub window_seconds: u64,
    /// Lockout duration in seconds
    pub ban_duration_seconds: u64,
}

impl From<&common::config::AuthConfig> for RateLimiterConfig {
    fn from(config: &common::config::AuthConfig) -> Self {
        Self {
            max_attempts: config.max_login_attempts,
            window_seconds: config.login_window_secs,
            ban_duration_seconds: config.lockout_secs,
        }
    }
}

/// Upper bound on a lockout, keeps deadline arithmetic in range
const MAX_LOCKOUT_SECS: u64 = 100 * 365 * 24 * 60 * 60;

#[derive(Debug)]
struct RateLimiterEntry {
    /// Attempts in the current window that have not been cleared by a success
    attempts: u32,
    /// Start of the current window
    window_start: Instant,
    /// Ban expiration time
    ban_expires: Option<Instant>,
}

impl RateLimiterEntry {
    fn is_banned(&self, now: Instant) -> bool {
        self.ban_expires.is_some_and(|expires| now < expires)
    }

    /// Window over, or the lockout it led to has ended
    fn is_stale(&self, now: Instant, window: Duration) -> bool {
        !self.is_banned(now)
            && (self.ban_expires.is_some() || now.duration_since(self.window_start) >= window)
    }
}

/// Counts login attempts per key and locks a key out once it crosses the
/// configured limit.
///
/// An attempt is reserved before the password is checked and cleared again
/// on success, so concurrent requests can not race past the limit.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, RateLimiterEntry>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Reserve an attempt for `key`.
    ///
    /// Returns `false` while `key` is locked out. The reservation that
    /// reaches `max_attempts` starts the lockout.
    pub async fn try_acquire(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let window = Duration::from_secs(self.config.window_seconds);

        entries.retain(|_, entry| !entry.is_stale(now, window));

        let entry = entries.entry(key.to_string()).or_insert(RateLimiterEntry {
            attempts: 0,
            window_start: now,
            ban_expires: None,
        });

        if entry.is_banned(now) || entry.attempts >= self.config.max_attempts {
            return false;
        }

        entry.attempts += 1;

        if entry.attempts >= self.config.max_attempts {
            entry.ban_expires = Some(deadline(now, self.config.ban_duration_seconds));
            warn!(
                "Locked out {} for {} seconds after {} attempts",
                key, self.config.ban_duration_seconds, entry.attempts
            );
        }

        true
    }

    /// Forget all attempts for `key`
    pub async fn reset(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}

fn deadline(now: Instant, secs: u64) -> Instant {
    let secs = secs.min(MAX_LOCKOUT_SECS);
    now.checked_add(Duration::from_secs(secs))
        .or_else(|| now.checked_add(Duration::from_secs(60 * 60)))
        .unwrap_or(now)
}
