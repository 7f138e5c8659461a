use url::Url;

use crate::badge::BadgeError;
use crate::net::BadgeConfig;

/// Concrete URLs for one notification server.
///
/// The push stream uses `wss://` when the server is served over `https://`
/// and `ws://` otherwise, on the same host and port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEndpoints {
    origin: String,
    secure: bool,
    count_url: Url,
    push_url: Url,
    read_url: Url,
}

impl NotificationEndpoints {
    /// Endpoints for `server_url` with the default paths.
    pub fn new(server_url: &str) -> Result<Self, BadgeError> {
        Self::from_config(&BadgeConfig::new(server_url))
    }

    pub fn from_config(config: &BadgeConfig) -> Result<Self, BadgeError> {
        let trimmed = config.server_url.trim();
        if trimmed.is_empty() {
            return Err(BadgeError::InvalidUrl("URL cannot be empty".into()));
        }

        let base = Url::parse(trimmed)
            .map_err(|e| BadgeError::InvalidUrl(format!("{}: {}", trimmed, e)))?;

        let secure = match base.scheme() {
            "https" => true,
            "http" => false,
            other => {
                return Err(BadgeError::InvalidUrl(format!(
                    "unsupported scheme '{}', expected http or https",
                    other
                )));
            }
        };

        let host = base
            .host_str()
            .ok_or_else(|| BadgeError::InvalidUrl(format!("{}: missing host", trimmed)))?;
        let authority = match base.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let origin = base.origin().ascii_serialization();
        let ws_scheme = if secure { "wss" } else { "ws" };

        let count_url = parse_url(&format!("{}{}", origin, normalize_path(&config.count_path, false)))?;
        let push_url = parse_url(&format!(
            "{}://{}{}",
            ws_scheme,
            authority,
            normalize_path(&config.push_path, false)
        ))?;
        let read_url = parse_url(&format!("{}{}", origin, normalize_path(&config.read_path, true)))?;

        Ok(Self {
            origin,
            secure,
            count_url,
            push_url,
            read_url,
        })
    }

    /// `scheme://host[:port]`, as sent in the `Origin` header.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn count_url(&self) -> &Url {
        &self.count_url
    }

    pub fn push_url(&self) -> &Url {
        &self.push_url
    }

    pub fn mark_read_url(&self, notification_id: u64) -> Result<Url, BadgeError> {
        self.read_url
            .join(&format!("{}/", notification_id))
            .map_err(|e| BadgeError::InvalidUrl(e.to_string()))
    }

    pub fn mark_all_read_url(&self) -> Result<Url, BadgeError> {
        self.read_url
            .join("all/")
            .map_err(|e| BadgeError::InvalidUrl(e.to_string()))
    }
}

fn parse_url(raw: &str) -> Result<Url, BadgeError> {
    Url::parse(raw).map_err(|e| BadgeError::InvalidUrl(format!("{}: {}", raw, e)))
}

fn normalize_path(path: &str, trailing_slash: bool) -> String {
    let path = path.trim();
    let mut normalized = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };
    if trailing_slash && !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insecure_server_uses_ws() {
        let endpoints = NotificationEndpoints::new("http://localhost:8000").unwrap();
        assert!(!endpoints.is_secure());
        assert_eq!(endpoints.origin(), "http://localhost:8000");
        assert_eq!(
            endpoints.count_url().as_str(),
            "http://localhost:8000/notifications/count/"
        );
        assert_eq!(
            endpoints.push_url().as_str(),
            "ws://localhost:8000/ws/notifications/"
        );
    }

    #[test]
    fn test_secure_server_uses_wss() {
        let endpoints = NotificationEndpoints::new("https://blog.example.com/").unwrap();
        assert!(endpoints.is_secure());
        assert_eq!(endpoints.origin(), "https://blog.example.com");
        assert_eq!(
            endpoints.push_url().as_str(),
            "wss://blog.example.com/ws/notifications/"
        );
    }

    #[test]
    fn test_custom_port_is_kept() {
        let endpoints = NotificationEndpoints::new("https://blog.example.com:8443").unwrap();
        assert_eq!(
            endpoints.push_url().as_str(),
            "wss://blog.example.com:8443/ws/notifications/"
        );
        assert_eq!(endpoints.origin(), "https://blog.example.com:8443");
    }

    #[test]
    fn test_mark_read_urls() {
        let endpoints = NotificationEndpoints::new("http://127.0.0.1:8000").unwrap();
        assert_eq!(
            endpoints.mark_read_url(42).unwrap().as_str(),
            "http://127.0.0.1:8000/notifications/read/42/"
        );
        assert_eq!(
            endpoints.mark_all_read_url().unwrap().as_str(),
            "http://127.0.0.1:8000/notifications/read/all/"
        );
    }

    #[test]
    fn test_custom_paths_are_normalized() {
        let config = BadgeConfig::new("http://localhost")
            .with_count_path("api/unread")
            .with_push_path("live")
            .with_read_path("/api/read");
        let endpoints = NotificationEndpoints::from_config(&config).unwrap();
        assert_eq!(endpoints.count_url().as_str(), "http://localhost/api/unread");
        assert_eq!(endpoints.push_url().as_str(), "ws://localhost/live");
        assert_eq!(
            endpoints.mark_read_url(1).unwrap().as_str(),
            "http://localhost/api/read/1/"
        );
    }

    #[test]
    fn test_invalid_urls() {
        for url in ["", "   ", "not-a-url", "ftp://example.com", "ws://example.com"] {
            assert!(
                matches!(NotificationEndpoints::new(url), Err(BadgeError::InvalidUrl(_))),
                "expected {url:?} to be rejected"
            );
        }
    }
}
