//! # Notification Badge for Bevy
//!
//! An unread-notification count badge for Bevy UI. The count is fetched once
//! from the server over HTTP and then bumped by every message arriving on a
//! WebSocket push stream. Each push also shows a short-lived toast.
//!
//! ## Example
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_notify_badge::{BadgeConfig, NotificationBadgeBundle, NotificationBadgePlugin};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(NotificationBadgePlugin::new(
//!             BadgeConfig::new("https://blog.example.com").with_session_cookie("sessionid=..."),
//!         ))
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     commands.spawn(Camera2d);
//!     commands.spawn(NotificationBadgeBundle::new(Node {
//!         position_type: PositionType::Absolute,
//!         top: Val::Px(8.0),
//!         left: Val::Px(8.0),
//!         ..default()
//!     }));
//! }
//! ```
//!
//! The [`badge`] module has no Bevy dependency and can drive any
//! [`BadgeView`](badge::BadgeView) on its own.

pub mod badge;
pub mod badge_bevy;
pub mod net;

pub use badge::{BadgeController, BadgeError, BadgeEvent, BadgeView, StreamState};
pub use badge_bevy::{
    BadgeControllerResource, BadgeUiPlugin, NotificationBadge, NotificationBadgeBundle,
    NotificationBadgePlugin, NotificationClientResource,
};
pub use net::{BadgeConfig, NotificationClient, ReconnectPolicy};
