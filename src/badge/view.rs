/// Where a badge is drawn.
///
/// The controller never reads the count back from the view to decide
/// anything; `displayed_count` is only used to skip redundant writes.
pub trait BadgeView {
    /// The count currently shown, if the view shows a parseable number.
    fn displayed_count(&self) -> Option<u64>;

    fn set_count(&mut self, count: u64);

    fn set_visible(&mut self, visible: bool);
}

/// Headless view that just remembers what it was told.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBadgeView {
    pub text: String,
    pub visible: bool,
    /// Number of `set_count` calls received
    pub writes: usize,
}

impl MemoryBadgeView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BadgeView for MemoryBadgeView {
    fn displayed_count(&self) -> Option<u64> {
        self.text.trim().parse().ok()
    }

    fn set_count(&mut self, count: u64) {
        self.text = count.to_string();
        self.writes += 1;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_view_round_trip() {
        let mut view = MemoryBadgeView::new();
        assert_eq!(view.displayed_count(), None);

        view.set_count(12);
        view.set_visible(true);
        assert_eq!(view.displayed_count(), Some(12));
        assert_eq!(view.text, "12");
        assert!(view.visible);
        assert_eq!(view.writes, 1);
    }
}
