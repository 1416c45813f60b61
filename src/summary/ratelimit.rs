use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Fixed-window request limiter keyed per caller, bounding cost exposure to
/// the external language-model provider.
pub struct FixedWindowLimiter {
    window: Duration,
    max_requests: u32,
    windows: Mutex<HashMap<String, CallerWindow>>,
}

struct CallerWindow {
    started_at: Instant,
    count: u32,
}

impl FixedWindowLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests: max_requests.max(1),
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Record one request from `caller`; returns false when over budget.
    pub fn allow(&self, caller: &str) -> bool {
        self.allow_at(caller, Instant::now())
    }

    fn allow_at(&self, caller: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        // Drop expired windows so the map stays bounded by active callers
        windows.retain(|_, w| now.duration_since(w.started_at) < self.window);

        let entry = windows.entry(caller.to_string()).or_insert(CallerWindow {
            started_at: now,
            count: 0,
        });

        if entry.count >= self.max_requests {
            return false;
        }
        entry.count += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enforces_budget_within_window() {
        let limiter = FixedWindowLimiter::new(Duration::from_secs(60), 2);
        let now = Instant::now();

        assert!(limiter.allow_at("a", now));
        assert!(limiter.allow_at("a", now));
        assert!(!limiter.allow_at("a", now));
    }

    #[test]
    fn callers_are_limited_independently() {
        let limiter = FixedWindowLimiter::new(Duration::from_secs(60), 1);
        let now = Instant::now();

        assert!(limiter.allow_at("a", now));
        assert!(limiter.allow_at("b", now));
        assert!(!limiter.allow_at("a", now));
    }

    #[test]
    fn budget_resets_after_window_expiry() {
        let limiter = FixedWindowLimiter::new(Duration::from_secs(60), 1);
        let now = Instant::now();

        assert!(limiter.allow_at("a", now));
        assert!(!limiter.allow_at("a", now + Duration::from_secs(30)));
        assert!(limiter.allow_at("a", now + Duration::from_secs(61)));
    }
}
