use std::time::Duration;

use bevy::prelude::*;

use crate::badge::BadgeController;
use crate::net::{BadgeConfig, BadgeEventReceiver, NotificationClient};

/// Marker component for badge nodes driven by the controller
#[derive(Component)]
pub struct NotificationBadge;

#[derive(Bundle)]
pub struct NotificationBadgeBundle {
    badge: NotificationBadge,
    node: Node,
    text: Text,
    visibility: Visibility,
    interaction: Interaction,
}

impl NotificationBadgeBundle {
    /// A badge node, hidden until the first non-zero count arrives.
    pub fn new(node: Node) -> impl Bundle {
        (
            Self {
                badge: NotificationBadge,
                node,
                text: Text::new(""),
                visibility: Visibility::Hidden,
                interaction: Interaction::default(),
            },
            TextFont::from_font_size(14.0),
            TextColor(Color::WHITE),
            BackgroundColor(Color::srgb(0.86, 0.15, 0.15)),
        )
    }
}

/// The single owner of the badge state. Systems are the only writers.
#[derive(Resource, Default, Deref, DerefMut)]
pub struct BadgeControllerResource(pub BadgeController);

/// Events from the network worker, drained once per frame
#[derive(Resource)]
pub struct BadgeEventSource(pub BadgeEventReceiver);

/// Bevy Resource wrapper for the network worker handle.
#[derive(Resource, Clone)]
pub struct NotificationClientResource(pub NotificationClient);

impl NotificationClientResource {
    pub fn inner(&self) -> &NotificationClient {
        &self.0
    }
}

impl std::ops::Deref for NotificationClientResource {
    type Target = NotificationClient;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Resource, Clone, Debug)]
pub struct BadgeUiSettings {
    pub toast_duration: Duration,
    pub max_visible_toasts: usize,
    pub clear_on_click: bool,
}

impl BadgeUiSettings {
    pub fn from_config(config: &BadgeConfig) -> Self {
        Self {
            toast_duration: config.toast_duration,
            max_visible_toasts: config.max_visible_toasts,
            clear_on_click: config.clear_on_click,
        }
    }
}

impl Default for BadgeUiSettings {
    fn default() -> Self {
        Self::from_config(&BadgeConfig::default())
    }
}

/// Column that toasts are stacked into
#[derive(Component)]
pub struct ToastStack;

/// One on-screen toast
#[derive(Component)]
pub struct ToastNode {
    pub notification_id: Option<u64>,
    pub lifetime: Timer,
}
