use bevy::prelude::*;

use crate::badge::{NotificationKind, Toast};
use crate::badge_bevy::systems::types::*;

/// Spawn the column toasts are stacked into (top-right corner)
pub fn spawn_toast_stack(mut commands: Commands) {
    commands.spawn((
        ToastStack,
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            right: Val::Px(12.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(6.0),
            ..default()
        },
    ));
}

/// Move pending toasts from the controller onto the screen
pub fn show_toasts(
    mut commands: Commands,
    mut controller: ResMut<BadgeControllerResource>,
    settings: Res<BadgeUiSettings>,
    stacks: Query<Entity, With<ToastStack>>,
    visible: Query<(), With<ToastNode>>,
) {
    if controller.pending_toasts() == 0 {
        return;
    }
    let Some(stack) = stacks.iter().next() else {
        return;
    };

    let mut shown = visible.iter().count();
    while shown < settings.max_visible_toasts {
        let Some(toast) = controller.next_toast() else {
            break;
        };
        let entity = spawn_toast(&mut commands, &toast, &settings);
        commands.entity(stack).add_child(entity);
        shown += 1;
    }
}

fn spawn_toast(commands: &mut Commands, toast: &Toast, settings: &BadgeUiSettings) -> Entity {
    let entity = commands
        .spawn((
            ToastNode {
                notification_id: toast.notification_id,
                lifetime: Timer::new(settings.toast_duration, TimerMode::Once),
            },
            Node {
                max_width: Val::Px(320.0),
                padding: UiRect::all(Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(toast_color(toast.kind)),
            Text::new(toast.message.clone()),
            TextFont::from_font_size(14.0),
            TextColor(Color::WHITE),
            Interaction::default(),
        ))
        .id();

    log::debug!("Showing toast: entity={:?} text={}", entity, toast.message);
    entity
}

fn toast_color(kind: Option<NotificationKind>) -> Color {
    match kind {
        Some(NotificationKind::NewPost) => Color::srgb(0.16, 0.38, 0.75),
        Some(NotificationKind::PostLiked) => Color::srgb(0.75, 0.2, 0.45),
        Some(NotificationKind::Other) | None => Color::srgb(0.25, 0.25, 0.28),
    }
}

/// Dismiss toasts that expired or were clicked.
///
/// Clicking a toast for a known notification marks that one as read.
pub fn update_toasts(
    mut commands: Commands,
    time: Res<Time>,
    client: Option<Res<NotificationClientResource>>,
    mut toasts: Query<(Entity, &Interaction, &mut ToastNode)>,
) {
    for (entity, interaction, mut toast) in &mut toasts {
        if *interaction == Interaction::Pressed {
            if let (Some(client), Some(id)) = (client.as_ref(), toast.notification_id) {
                client.mark_read(id);
            }
            commands.entity(entity).despawn();
            continue;
        }

        if toast.lifetime.tick(time.delta()).just_finished() {
            commands.entity(entity).despawn();
        }
    }
}
