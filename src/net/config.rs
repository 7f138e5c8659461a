use std::time::Duration;

use crate::badge::ToastQueue;

/// Exponential backoff for reconnecting the push stream.
///
/// Delay for attempt `n` (from 0) is `initial_delay * multiplier^n`, capped at
/// `max_delay`. The attempt counter resets once a connection has stayed open
/// for `stable_after`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    /// Consecutive failed attempts allowed before giving up; 0 disables reconnects
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    /// How long a connection must stay open before it counts as recovered
    pub stable_after: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            stable_after: Duration::from_secs(5),
        }
    }
}

impl ReconnectPolicy {
    /// Never reconnect: a closed stream stays closed.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 0,
            ..Self::default()
        }
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base_ms = self.initial_delay.as_millis() as f64;
        let delay_ms = base_ms * self.multiplier.powi(attempt as i32);
        let capped_ms = delay_ms.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped_ms as u64)
    }

    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Whether a connection that was open for `open_for` clears the failure count.
    pub fn is_stable(&self, open_for: Duration) -> bool {
        open_for >= self.stable_after
    }
}

/// Configuration for the notification badge client.
#[derive(Debug, Clone)]
pub struct BadgeConfig {
    /// Base URL of the server, `http://` or `https://`
    pub server_url: String,
    pub count_path: String,
    pub push_path: String,
    /// Prefix for mark-as-read calls; `<id>/` or `all/` is appended
    pub read_path: String,
    /// Raw `Cookie` header sent with every request, e.g. `sessionid=...`
    pub session_cookie: Option<String>,
    pub request_timeout: Duration,
    pub reconnect: ReconnectPolicy,
    pub toast_capacity: usize,
    pub toast_duration: Duration,
    pub max_visible_toasts: usize,
    /// Mark everything read when the badge is pressed
    pub clear_on_click: bool,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".to_string(),
            count_path: "/notifications/count/".to_string(),
            push_path: "/ws/notifications/".to_string(),
            read_path: "/notifications/read/".to_string(),
            session_cookie: None,
            request_timeout: Duration::from_secs(10),
            reconnect: ReconnectPolicy::default(),
            toast_capacity: ToastQueue::DEFAULT_CAPACITY,
            toast_duration: Duration::from_secs(4),
            max_visible_toasts: 3,
            clear_on_click: true,
        }
    }
}

impl BadgeConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    pub fn with_count_path(mut self, path: impl Into<String>) -> Self {
        self.count_path = path.into();
        self
    }

    pub fn with_push_path(mut self, path: impl Into<String>) -> Self {
        self.push_path = path.into();
        self
    }

    pub fn with_read_path(mut self, path: impl Into<String>) -> Self {
        self.read_path = path.into();
        self
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    pub fn with_toast_capacity(mut self, capacity: usize) -> Self {
        self.toast_capacity = capacity;
        self
    }

    pub fn with_toast_duration(mut self, duration: Duration) -> Self {
        self.toast_duration = duration;
        self
    }

    pub fn with_max_visible_toasts(mut self, max: usize) -> Self {
        self.max_visible_toasts = max;
        self
    }

    pub fn with_clear_on_click(mut self, enabled: bool) -> Self {
        self.clear_on_click = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_delays() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_secs(16));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_secs(30));
        assert_eq!(policy.delay_for_attempt(20), Duration::from_secs(30));
    }

    #[test]
    fn test_retry_limits() {
        let policy = ReconnectPolicy::default();
        assert!(policy.should_retry(0));
        assert!(policy.should_retry(4));
        assert!(!policy.should_retry(5));

        let disabled = ReconnectPolicy::disabled();
        assert!(!disabled.should_retry(0));
    }

    #[test]
    fn test_short_connections_are_not_stable() {
        let policy = ReconnectPolicy::default();
        assert!(!policy.is_stable(Duration::ZERO));
        assert!(!policy.is_stable(Duration::from_millis(4999)));
        assert!(policy.is_stable(Duration::from_secs(5)));
        assert!(policy.is_stable(Duration::from_secs(60)));
    }

    #[test]
    fn test_builder() {
        let config = BadgeConfig::new("https://blog.example.com")
            .with_session_cookie("sessionid=abc")
            .with_toast_capacity(4)
            .with_reconnect(ReconnectPolicy::disabled())
            .with_clear_on_click(false);

        assert_eq!(config.server_url, "https://blog.example.com");
        assert_eq!(config.session_cookie.as_deref(), Some("sessionid=abc"));
        assert_eq!(config.toast_capacity, 4);
        assert_eq!(config.reconnect.max_attempts, 0);
        assert!(!config.clear_on_click);
        assert_eq!(config.count_path, "/notifications/count/");
    }
}
