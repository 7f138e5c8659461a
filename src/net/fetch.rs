//! HTTP calls against the notification server.

use reqwest::Client;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use serde::Deserialize;
use url::Url;

use crate::badge::BadgeError;
use crate::net::{BadgeConfig, NotificationEndpoints};

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct AckResponse {
    success: bool,
}

/// Build the HTTP client shared by every request of one badge client.
pub fn build_http_client(config: &BadgeConfig) -> Result<Client, BadgeError> {
    let mut headers = HeaderMap::new();
    if let Some(ref cookie) = config.session_cookie {
        let value =
            HeaderValue::from_str(cookie).map_err(|e| BadgeError::InvalidHeader(e.to_string()))?;
        headers.insert(COOKIE, value);
    }

    Client::builder()
        .default_headers(headers)
        .timeout(config.request_timeout)
        .user_agent(format!("bevy_notify_badge/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| BadgeError::Runtime(format!("HTTP client: {}", e)))
}

/// Fetch the current unread count.
pub async fn fetch_unread_count(
    http: &Client,
    endpoints: &NotificationEndpoints,
) -> Result<u64, BadgeError> {
    let url = endpoints.count_url();
    log::debug!("Fetching unread count from {}", url);

    let body = get_text(http, url)
        .await
        .map_err(BadgeError::FetchFailure)?;
    parse_count(&body)
}

/// Decode a `{"count": n}` body.
pub fn parse_count(body: &str) -> Result<u64, BadgeError> {
    serde_json::from_str::<CountResponse>(body)
        .map(|response| response.count)
        .map_err(|e| BadgeError::FetchFailure(format!("invalid count response: {}", e)))
}

/// Mark one notification as read.
pub async fn mark_read(
    http: &Client,
    endpoints: &NotificationEndpoints,
    notification_id: u64,
) -> Result<(), BadgeError> {
    let url = endpoints.mark_read_url(notification_id)?;
    log::debug!("Marking notification {} as read", notification_id);
    acknowledge(http, &url).await
}

/// Mark every notification as read.
pub async fn mark_all_read(
    http: &Client,
    endpoints: &NotificationEndpoints,
) -> Result<(), BadgeError> {
    let url = endpoints.mark_all_read_url()?;
    log::debug!("Marking all notifications as read");
    acknowledge(http, &url).await
}

async fn acknowledge(http: &Client, url: &Url) -> Result<(), BadgeError> {
    let body = get_text(http, url)
        .await
        .map_err(BadgeError::RequestFailed)?;
    let ack: AckResponse = serde_json::from_str(&body).map_err(|e| {
        BadgeError::RequestFailed(format!("invalid response from {}: {}", url, e))
    })?;

    if ack.success {
        Ok(())
    } else {
        Err(BadgeError::RequestFailed(format!(
            "server refused {}",
            url
        )))
    }
}

/// GET a URL and return its body, or a description of what went wrong.
async fn get_text(http: &Client, url: &Url) -> Result<String, String> {
    let response = http
        .get(url.clone())
        .send()
        .await
        .map_err(|e| format!("request to {} failed: {}", url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("server returned {} for {}", status, url));
    }

    response
        .text()
        .await
        .map_err(|e| format!("failed to read response from {}: {}", url, e))
}
