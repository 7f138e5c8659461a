//! Error types for the notification badge.

use thiserror::Error;

/// Everything that can go wrong between the server and the badge.
///
/// None of these are fatal to the host app. The controller logs them and
/// keeps the last known count.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BadgeError {
    /// The unread-count request failed or returned an unusable body
    #[error("Failed to fetch unread count: {0}")]
    FetchFailure(String),

    /// A push payload could not be decoded or has no `message` field
    #[error("Malformed push message: {0}")]
    MalformedMessage(String),

    /// The push stream ended
    #[error("Push stream closed ({code}): {reason}")]
    StreamClosed { code: u16, reason: String },

    /// A mark-as-read call failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The configured server URL can't be used
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// A configured header value (cookie, origin) is not a valid header
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    /// The network worker could not be started
    #[error("Network worker failed to start: {0}")]
    Runtime(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BadgeError::StreamClosed {
            code: 1006,
            reason: "Connection reset".to_string(),
        };
        assert_eq!(err.to_string(), "Push stream closed (1006): Connection reset");

        let err = BadgeError::MalformedMessage("missing field `message`".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed push message: missing field `message`"
        );
    }
}
