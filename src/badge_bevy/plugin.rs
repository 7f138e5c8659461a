//! Notification Badge Plugin Implementation

use bevy::prelude::*;

use crate::badge::BadgeController;
use crate::badge_bevy::systems::*;
use crate::net::{BadgeConfig, NotificationClient};

/// Badge UI without any networking.
///
/// Renders the controller into badge nodes and shows toasts. Feed it by
/// inserting a [`BadgeEventSource`], or drive [`BadgeControllerResource`]
/// directly.
pub struct BadgeUiPlugin {
    settings: BadgeUiSettings,
    toast_capacity: usize,
}

impl BadgeUiPlugin {
    pub fn new(config: &BadgeConfig) -> Self {
        Self {
            settings: BadgeUiSettings::from_config(config),
            toast_capacity: config.toast_capacity,
        }
    }
}

impl Default for BadgeUiPlugin {
    fn default() -> Self {
        Self::new(&BadgeConfig::default())
    }
}

impl Plugin for BadgeUiPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(BadgeControllerResource(
            BadgeController::with_toast_capacity(self.toast_capacity),
        ))
        .insert_resource(self.settings.clone())
        .add_systems(Startup, spawn_toast_stack)
        .add_systems(
            Update,
            (
                process_badge_events,
                handle_badge_clicks,
                render_badges,
                show_toasts,
                update_toasts,
            )
                .chain(),
        );
    }
}

/// Bevy plugin for a server-backed notification badge.
///
/// This plugin:
/// - Adds [`BadgeUiPlugin`]
/// - Starts the network worker, which fetches the unread count and opens the
///   push stream
/// - Exposes the worker as [`NotificationClientResource`]
///
/// ## Usage
///
/// ```ignore
/// App::new()
///     .add_plugins(NotificationBadgePlugin::new(BadgeConfig::new("https://blog.example.com")))
///     .run();
/// ```
pub struct NotificationBadgePlugin {
    config: BadgeConfig,
}

impl NotificationBadgePlugin {
    pub fn new(config: BadgeConfig) -> Self {
        Self { config }
    }
}

impl Plugin for NotificationBadgePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(BadgeUiPlugin::new(&self.config));

        log::info!("Starting notification client for {}", self.config.server_url);
        match NotificationClient::start(self.config.clone()) {
            Ok((client, receiver)) => {
                app.insert_resource(NotificationClientResource(client));
                app.insert_resource(BadgeEventSource(receiver));
            }
            Err(e) => {
                log::error!("Notification badge running without a server: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badge::BadgeEvent;
    use crate::net::badge_event_channel;
    use tokio::sync::mpsc;

    fn test_app(config: &BadgeConfig) -> (App, mpsc::Sender<BadgeEvent>) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(BadgeUiPlugin::new(config));

        let (tx, receiver) = badge_event_channel(32);
        app.insert_resource(BadgeEventSource(receiver));
        (app, tx)
    }

    fn push(tx: &mpsc::Sender<BadgeEvent>, message: &str) {
        tx.try_send(BadgeEvent::Push(format!(r#"{{"message":"{message}"}}"#)))
            .unwrap();
    }

    fn toast_count(app: &mut App) -> usize {
        let mut query = app.world_mut().query::<&ToastNode>();
        query.iter(app.world()).count()
    }

    #[test]
    fn test_badge_follows_events() {
        let (mut app, tx) = test_app(&BadgeConfig::default());
        let badge = app
            .world_mut()
            .spawn(NotificationBadgeBundle::new(Node::default()))
            .id();

        app.update();
        assert_eq!(app.world().get::<Visibility>(badge), Some(&Visibility::Hidden));

        tx.try_send(BadgeEvent::CountSnapshot(3)).unwrap();
        app.update();
        assert_eq!(
            app.world().get::<Text>(badge).map(|t| t.0.as_str()),
            Some("3")
        );
        assert_eq!(
            app.world().get::<Visibility>(badge),
            Some(&Visibility::Inherited)
        );

        push(&tx, "hi");
        app.update();
        assert_eq!(
            app.world().get::<Text>(badge).map(|t| t.0.as_str()),
            Some("4")
        );

        app.world_mut()
            .resource_mut::<BadgeControllerResource>()
            .set_count(0);
        app.update();
        assert_eq!(app.world().get::<Visibility>(badge), Some(&Visibility::Hidden));
    }

    #[test]
    fn test_snapshot_after_push_overwrites() {
        let (mut app, tx) = test_app(&BadgeConfig::default());
        let badge = app
            .world_mut()
            .spawn(NotificationBadgeBundle::new(Node::default()))
            .id();

        push(&tx, "early");
        app.update();
        assert_eq!(
            app.world().get::<Text>(badge).map(|t| t.0.as_str()),
            Some("1")
        );

        tx.try_send(BadgeEvent::CountSnapshot(5)).unwrap();
        app.update();
        assert_eq!(
            app.world().get::<Text>(badge).map(|t| t.0.as_str()),
            Some("5")
        );
    }

    #[test]
    fn test_malformed_push_leaves_badge_alone() {
        let (mut app, tx) = test_app(&BadgeConfig::default());
        tx.try_send(BadgeEvent::CountSnapshot(2)).unwrap();
        tx.try_send(BadgeEvent::Push("garbage".to_string())).unwrap();
        push(&tx, "after");
        app.update();

        assert_eq!(app.world().resource::<BadgeControllerResource>().count(), 3);
        assert_eq!(toast_count(&mut app), 1);
    }

    #[test]
    fn test_push_spawns_toast() {
        let (mut app, tx) = test_app(&BadgeConfig::default());
        push(&tx, "A new blog post has been published!");
        app.update();

        let mut query = app.world_mut().query_filtered::<&Text, With<ToastNode>>();
        let texts: Vec<String> = query.iter(app.world()).map(|t| t.0.clone()).collect();
        assert_eq!(texts, vec!["A new blog post has been published!".to_string()]);
    }

    #[test]
    fn test_visible_toasts_are_capped() {
        let config = BadgeConfig::default().with_max_visible_toasts(3);
        let (mut app, tx) = test_app(&config);
        for i in 0..5 {
            push(&tx, &format!("m{i}"));
        }
        app.update();

        assert_eq!(toast_count(&mut app), 3);
        assert_eq!(
            app.world()
                .resource::<BadgeControllerResource>()
                .pending_toasts(),
            2
        );
        assert_eq!(app.world().resource::<BadgeControllerResource>().count(), 5);
    }

    #[test]
    fn test_toast_stack_is_spawned() {
        let (mut app, _tx) = test_app(&BadgeConfig::default());
        app.update();

        let mut query = app.world_mut().query::<&ToastStack>();
        assert_eq!(query.iter(app.world()).count(), 1);
    }
}
