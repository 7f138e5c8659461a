//! Notification Network Layer
//!
//! Fetches the unread count over HTTP (reqwest) and holds the push stream
//! open over WebSocket (tokio-tungstenite). Everything runs on a dedicated
//! thread with its own Tokio runtime and reports back as
//! [`BadgeEvent`](crate::badge::BadgeEvent)s.

mod client;
mod config;
mod endpoints;
pub mod fetch;
mod stream;

pub use client::{
    BadgeEventReceiver, ClientCommand, EVENT_CHANNEL_CAPACITY, NotificationClient,
    badge_event_channel,
};
pub use config::{BadgeConfig, ReconnectPolicy};
pub use endpoints::NotificationEndpoints;
pub use stream::{ABNORMAL_CLOSURE, PushStream};
