use bevy::prelude::*;

use crate::badge_bevy::systems::types::*;

/// Pressing a badge marks every notification as read.
///
/// The count is not cleared locally; the worker re-fetches it once the
/// server acknowledges.
pub fn handle_badge_clicks(
    badges: Query<&Interaction, (Changed<Interaction>, With<NotificationBadge>)>,
    client: Option<Res<NotificationClientResource>>,
    settings: Res<BadgeUiSettings>,
) {
    if !settings.clear_on_click {
        return;
    }
    let Some(client) = client else {
        return;
    };

    for interaction in &badges {
        if *interaction == Interaction::Pressed {
            log::info!("Badge pressed, marking all notifications as read");
            client.mark_all_read();
        }
    }
}
