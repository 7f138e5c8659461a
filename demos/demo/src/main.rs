use bevy::prelude::*;
use bevy_notify_badge::{BadgeConfig, NotificationBadgeBundle, NotificationBadgePlugin};

fn main() {
    let server = std::env::var("NOTIFY_BADGE_SERVER")
        .unwrap_or_else(|_| "http://localhost:8000".to_string());

    // Session cookie of a logged-in user, e.g. "sessionid=..."
    let mut config = BadgeConfig::new(server);
    if let Ok(cookie) = std::env::var("NOTIFY_BADGE_COOKIE") {
        config = config.with_session_cookie(cookie);
    }

    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(NotificationBadgePlugin::new(config))
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);

    // Top bar with a label and the badge next to it
    let bar = commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Px(40.0),
            padding: UiRect::horizontal(Val::Px(12.0)),
            align_items: AlignItems::Center,
            column_gap: Val::Px(8.0),
            ..default()
        })
        .id();

    let label = commands.spawn(Text::new("Notifications")).id();
    let badge = commands
        .spawn(NotificationBadgeBundle::new(Node {
            padding: UiRect::axes(Val::Px(6.0), Val::Px(2.0)),
            ..default()
        }))
        .id();

    commands.entity(bar).add_children(&[label, badge]);
}
