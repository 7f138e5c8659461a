use crate::badge::BadgeError;

/// Push-stream connection states.
///
/// `Closed` is terminal unless the reconnect policy allows another attempt,
/// in which case the stream goes back to `Connecting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum StreamState {
    #[default]
    Connecting = 0,
    Open = 1,
    Closed = 2,
}

impl StreamState {
    pub fn from_u32(value: u32) -> Self {
        match value {
            0 => StreamState::Connecting,
            1 => StreamState::Open,
            _ => StreamState::Closed,
        }
    }
}

/// Events delivered from the network worker to the badge controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeEvent {
    /// Authoritative unread count from the server
    CountSnapshot(u64),
    /// The count request failed
    FetchFailed(BadgeError),
    /// The push stream moved to a new state
    StreamStateChanged(StreamState),
    /// Raw text frame from the push stream
    Push(String),
    /// The push stream closed; `reconnecting` says whether another attempt follows
    StreamClosed {
        code: u16,
        reason: String,
        reconnecting: bool,
    },
    /// A mark-as-read call failed
    RequestFailed(BadgeError),
}
