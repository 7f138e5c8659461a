use bevy::prelude::*;

use crate::badge::BadgeView;
use crate::badge_bevy::systems::types::*;

/// [`BadgeView`] over one badge entity's text and visibility.
///
/// Only writes a component when its value actually changes, so change
/// detection stays quiet while the count is stable.
pub struct UiBadgeView<'a> {
    text: Mut<'a, Text>,
    visibility: Mut<'a, Visibility>,
}

impl<'a> UiBadgeView<'a> {
    pub fn new(text: Mut<'a, Text>, visibility: Mut<'a, Visibility>) -> Self {
        Self { text, visibility }
    }
}

impl BadgeView for UiBadgeView<'_> {
    fn displayed_count(&self) -> Option<u64> {
        self.text.0.trim().parse().ok()
    }

    fn set_count(&mut self, count: u64) {
        self.text.0 = count.to_string();
    }

    fn set_visible(&mut self, visible: bool) {
        let target = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if *self.visibility != target {
            *self.visibility = target;
        }
    }
}

/// Drain worker events into the controller
pub fn process_badge_events(
    source: Option<Res<BadgeEventSource>>,
    mut controller: ResMut<BadgeControllerResource>,
) {
    let Some(source) = source else {
        return;
    };

    while let Some(event) = source.0.try_recv() {
        log::debug!("Processing badge event: {:?}", event);
        controller.handle_event(event);
    }
}

/// Reflect the controller's count into every badge node
pub fn render_badges(
    controller: Res<BadgeControllerResource>,
    mut badges: Query<(&mut Text, &mut Visibility), With<NotificationBadge>>,
) {
    for (text, visibility) in &mut badges {
        let mut view = UiBadgeView::new(text, visibility);
        controller.render(&mut view);
    }
}
