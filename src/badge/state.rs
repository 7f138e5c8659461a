/// Unread-notification count owned by the badge controller.
///
/// Visibility is derived: the badge is shown iff `count > 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BadgeState {
    count: u64,
}

/// What a badge should look like for a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeRender {
    Hidden,
    Visible(u64),
}

impl BadgeState {
    pub fn new(count: u64) -> Self {
        Self { count }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_visible(&self) -> bool {
        self.count > 0
    }

    /// Overwrite the count with an authoritative value.
    pub fn set_count(&mut self, count: u64) {
        self.count = count;
    }

    /// Count one new notification.
    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    pub fn render(&self) -> BadgeRender {
        if self.count > 0 {
            BadgeRender::Visible(self.count)
        } else {
            BadgeRender::Hidden
        }
    }
}

impl BadgeRender {
    /// Text shown on the badge, if it is shown at all.
    pub fn label(&self) -> Option<String> {
        match self {
            BadgeRender::Hidden => None,
            BadgeRender::Visible(count) => Some(count.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_hidden_iff_zero() {
        assert_eq!(BadgeState::new(0).render(), BadgeRender::Hidden);
        assert!(!BadgeState::new(0).is_visible());

        for count in [1, 2, 9, 10, 99, 100, 12_345, u64::MAX] {
            let state = BadgeState::new(count);
            assert!(state.is_visible());
            assert_eq!(state.render(), BadgeRender::Visible(count));
            assert_eq!(state.render().label(), Some(count.to_string()));
        }
    }

    #[test]
    fn test_increment_and_set() {
        let mut state = BadgeState::default();
        state.increment();
        state.increment();
        assert_eq!(state.count(), 2);

        state.set_count(7);
        assert_eq!(state.count(), 7);

        state.set_count(0);
        assert_eq!(state.render(), BadgeRender::Hidden);
        assert_eq!(state.render().label(), None);
    }

    #[test]
    fn test_increment_saturates() {
        let mut state = BadgeState::new(u64::MAX);
        state.increment();
        assert_eq!(state.count(), u64::MAX);
    }
}
