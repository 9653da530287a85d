//! Per-origin submission rate guard.
//!
//! Counters live in process memory for the lifetime of the serving
//! process: a restart clears them, and horizontally scaled deployments do
//! not share them. Replacing this with a shared counter store is a
//! deliberate redesign, not a drop-in change.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::http::HeaderMap;

/// Rolling window length. The window restarts from the first attempt after
/// expiry, not from a clock boundary.
pub const WINDOW: Duration = Duration::from_secs(60 * 60);

/// Submissions allowed per origin within one window.
pub const MAX_PER_WINDOW: u32 = 10;

struct Entry {
    count: u32,
    window_start: Instant,
}

#[derive(Clone, Default)]
pub struct RateLimiter {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl RateLimiter {
    /// Record an attempt for `origin` and report whether it is allowed.
    /// Attempts past the cap still count against the window.
    pub fn allow(&self, origin: &str) -> bool {
        self.allow_at(origin, Instant::now())
    }

    fn allow_at(&self, origin: &str, now: Instant) -> bool {
        // Single lock acquisition for the whole read-modify-write; no await
        // happens while it is held, so same-origin requests cannot
        // interleave and slip past the cap.
        let mut entries = self.entries.lock().unwrap();
        match entries.get_mut(origin) {
            None => {
                entries.insert(origin.to_owned(), Entry { count: 1, window_start: now });
                true
            }
            Some(entry) if now.duration_since(entry.window_start) > WINDOW => {
                *entry = Entry { count: 1, window_start: now };
                true
            }
            Some(entry) => {
                entry.count += 1;
                entry.count <= MAX_PER_WINDOW
            }
        }
    }

    #[cfg(test)]
    fn count(&self, origin: &str) -> u32 {
        self.entries.lock().unwrap().get(origin).map(|e| e.count).unwrap_or(0)
    }
}

/// Derive the rate-limit bucket key from the request's forwarding
/// metadata: first hop of `x-forwarded-for`, else `x-real-ip`, else a
/// fixed fallback (direct connections during local dev).
pub fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            return first.trim().to_owned();
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        return real_ip.to_owned();
    }

    "127.0.0.1".to_owned()
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn allows_up_to_the_cap_then_rejects() {
        let limiter = RateLimiter::default();
        for _ in 0..MAX_PER_WINDOW {
            assert!(limiter.allow("198.51.100.7"));
        }
        assert!(!limiter.allow("198.51.100.7"));
    }

    #[test]
    fn rejected_attempts_still_count() {
        let limiter = RateLimiter::default();
        for _ in 0..MAX_PER_WINDOW + 1 {
            limiter.allow("198.51.100.7");
        }
        assert_eq!(limiter.count("198.51.100.7"), MAX_PER_WINDOW + 1);
    }

    #[test]
    fn origins_are_counted_independently() {
        let limiter = RateLimiter::default();
        for _ in 0..MAX_PER_WINDOW {
            assert!(limiter.allow("198.51.100.7"));
        }
        assert!(!limiter.allow("198.51.100.7"));
        assert!(limiter.allow("203.0.113.9"));
    }

    #[test]
    fn window_rolls_forward_from_first_attempt_after_expiry() {
        let limiter = RateLimiter::default();
        let t0 = Instant::now();
        for _ in 0..MAX_PER_WINDOW + 1 {
            limiter.allow_at("198.51.100.7", t0);
        }
        assert!(!limiter.allow_at("198.51.100.7", t0));

        let later = t0 + WINDOW + Duration::from_secs(1);
        assert!(limiter.allow_at("198.51.100.7", later));
        assert_eq!(limiter.count("198.51.100.7"), 1);
    }

    #[test]
    fn attempt_at_exact_window_edge_is_still_inside() {
        let limiter = RateLimiter::default();
        let t0 = Instant::now();
        for _ in 0..MAX_PER_WINDOW {
            limiter.allow_at("198.51.100.7", t0);
        }
        assert!(!limiter.allow_at("198.51.100.7", t0 + WINDOW));
    }

    #[test]
    fn forwarded_for_takes_the_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers), "203.0.113.9");
    }

    #[test]
    fn real_ip_is_the_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers), "10.0.0.2");
    }

    #[test]
    fn direct_connections_share_the_fixed_bucket() {
        assert_eq!(client_ip(&HeaderMap::new()), "127.0.0.1");
    }
}
