use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// In-memory sliding-window limiter keyed by strings like `"login:<ip>"`.
/// Lives in Rocket managed state, so it resets on restart.
pub struct RateLimiter {
    entries: Mutex<HashMap<String, Vec<Instant>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        RateLimiter {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Record one attempt for `key`. Returns false (and records nothing)
    /// once `max_attempts` have already happened inside `window`.
    pub fn check_and_record(&self, key: &str, max_attempts: u64, window: Duration) -> bool {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        let attempts = map.entry(key.to_string()).or_default();
        attempts.retain(|t| now.duration_since(*t) < window);

        if (attempts.len() as u64) < max_attempts {
            attempts.push(now);
            true
        } else {
            false
        }
    }

    /// Forget every attempt for `key` (after a successful login).
    pub fn reset(&self, key: &str) {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(key);
    }

    /// Drop keys with no attempts newer than `max_age`.
    pub fn cleanup(&self, max_age: Duration) {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        map.retain(|_, attempts| {
            attempts.retain(|t| now.duration_since(*t) < max_age);
            !attempts.is_empty()
        });
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(900);

    #[test]
    fn allows_up_to_limit() {
        let rl = RateLimiter::new();
        assert!(rl.check_and_record("login:1.2.3.4", 2, WINDOW));
        assert!(rl.check_and_record("login:1.2.3.4", 2, WINDOW));
        assert!(!rl.check_and_record("login:1.2.3.4", 2, WINDOW));
    }

    #[test]
    fn keys_are_independent() {
        let rl = RateLimiter::new();
        assert!(rl.check_and_record("login:a", 1, WINDOW));
        assert!(!rl.check_and_record("login:a", 1, WINDOW));
        assert!(rl.check_and_record("login:b", 1, WINDOW));
    }

    #[test]
    fn reset_clears_attempts() {
        let rl = RateLimiter::new();
        assert!(rl.check_and_record("login:a", 1, WINDOW));
        rl.reset("login:a");
        assert!(rl.check_and_record("login:a", 1, WINDOW));
    }

    #[test]
    fn zero_window_never_blocks() {
        let rl = RateLimiter::new();
        for _ in 0..5 {
            assert!(rl.check_and_record("k", 1, Duration::ZERO));
        }
    }

    #[test]
    fn cleanup_drops_stale_keys() {
        let rl = RateLimiter::new();
        rl.check_and_record("k", 5, WINDOW);
        rl.cleanup(Duration::ZERO);
        assert_eq!(rl.tracked_keys(), 0);
    }
}
