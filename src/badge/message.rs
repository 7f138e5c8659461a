use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::badge::BadgeError;

/// Kind of notification, as labelled by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewPost,
    PostLiked,
    #[serde(other)]
    Other,
}

/// One push message from the notification socket.
///
/// Only `message` is required. Every message that decodes counts as exactly
/// one new notification, whatever `is_read` says.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushMessage {
    #[serde(deserialize_with = "text_or_number")]
    pub message: String,
    #[serde(default)]
    pub notification_type: Option<NotificationKind>,
    #[serde(default)]
    pub notification_id: Option<u64>,
    #[serde(default)]
    pub is_read: bool,
}

impl PushMessage {
    /// Decode a raw text frame.
    pub fn parse(raw: &str) -> Result<Self, BadgeError> {
        serde_json::from_str(raw).map_err(|e| BadgeError::MalformedMessage(e.to_string()))
    }
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number for `message`, found {}",
            other
        ))),
    }
}
