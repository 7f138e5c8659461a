//! Notification Badge Bevy Plugin
//!
//! Provides Bevy integration for the badge controller and the network worker.
//! The controller lives in a resource and is only touched by systems, so the
//! count path and the push path are serialized by the schedule.

mod plugin;
mod systems;

pub use plugin::{BadgeUiPlugin, NotificationBadgePlugin};
pub use systems::*;
