//! Badge Controller
//!
//! Owns the unread count and turns the two input streams (count snapshots
//! and push messages) into badge renders and toasts. It has no I/O of its
//! own: events come in through [`BadgeController::handle_event`] and output
//! goes out through a [`BadgeView`] and the toast queue.

use crate::badge::{
    BadgeError, BadgeEvent, BadgeRender, BadgeState, BadgeView, PushMessage, StreamState, Toast,
    ToastQueue,
};

#[derive(Debug, Clone, Default)]
pub struct BadgeController {
    state: BadgeState,
    stream_state: StreamState,
    toasts: ToastQueue,
    last_error: Option<BadgeError>,
}

impl BadgeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_toast_capacity(capacity: usize) -> Self {
        Self {
            toasts: ToastQueue::new(capacity),
            ..Self::default()
        }
    }

    pub fn state(&self) -> &BadgeState {
        &self.state
    }

    pub fn count(&self) -> u64 {
        self.state.count()
    }

    pub fn stream_state(&self) -> StreamState {
        self.stream_state
    }

    /// The most recent error reported to the controller.
    pub fn last_error(&self) -> Option<&BadgeError> {
        self.last_error.as_ref()
    }

    /// Apply an authoritative count from the server.
    ///
    /// Overwrites any increments applied before it arrived.
    pub fn apply_count_snapshot(&mut self, count: u64) {
        log::info!(
            "Unread count snapshot: {} (was {})",
            count,
            self.state.count()
        );
        self.state.set_count(count);
    }

    /// Drive the count directly, e.g. after the user read everything locally.
    pub fn set_count(&mut self, count: u64) {
        self.state.set_count(count);
    }

    /// Handle one raw push payload.
    ///
    /// A payload that does not decode leaves the count untouched.
    pub fn on_push_message(&mut self, raw: &str) -> Result<(), BadgeError> {
        let message = match PushMessage::parse(raw) {
            Ok(message) => message,
            Err(e) => {
                self.last_error = Some(e.clone());
                return Err(e);
            }
        };

        log::info!("Received push notification: {}", message.message);
        self.state.increment();
        self.toasts.push(Toast::from(message));
        Ok(())
    }

    pub fn on_fetch_failed(&mut self, error: BadgeError) {
        log::warn!(
            "{} (keeping count at {})",
            error,
            self.state.count()
        );
        self.last_error = Some(error);
    }

    pub fn on_stream_state(&mut self, state: StreamState) {
        log::debug!("Push stream state: {:?}", state);
        self.stream_state = state;
    }

    pub fn on_stream_closed(&mut self, code: u16, reason: String, reconnecting: bool) {
        if reconnecting {
            log::warn!("Push stream closed ({}): {}; reconnecting", code, reason);
        } else {
            log::warn!("Push stream closed unexpectedly ({}): {}", code, reason);
        }
        self.stream_state = StreamState::Closed;
        self.last_error = Some(BadgeError::StreamClosed { code, reason });
    }

    /// Dispatch one worker event. Never fails; errors are logged and recorded.
    pub fn handle_event(&mut self, event: BadgeEvent) {
        match event {
            BadgeEvent::CountSnapshot(count) => self.apply_count_snapshot(count),
            BadgeEvent::FetchFailed(error) => self.on_fetch_failed(error),
            BadgeEvent::StreamStateChanged(state) => self.on_stream_state(state),
            BadgeEvent::Push(raw) => {
                if let Err(e) = self.on_push_message(&raw) {
                    log::warn!("Dropping push message: {}", e);
                }
            }
            BadgeEvent::StreamClosed {
                code,
                reason,
                reconnecting,
            } => self.on_stream_closed(code, reason, reconnecting),
            BadgeEvent::RequestFailed(error) => {
                log::warn!("{}", error);
                self.last_error = Some(error);
            }
        }
    }

    pub fn render_state(&self) -> BadgeRender {
        self.state.render()
    }

    /// Reflect the count into a view. Calling this again without a state
    /// change writes nothing new.
    pub fn render<V: BadgeView + ?Sized>(&self, view: &mut V) {
        match self.state.render() {
            BadgeRender::Visible(count) => {
                if view.displayed_count() != Some(count) {
                    view.set_count(count);
                }
                view.set_visible(true);
            }
            BadgeRender::Hidden => view.set_visible(false),
        }
    }

    pub fn pending_toasts(&self) -> usize {
        self.toasts.len()
    }

    pub fn next_toast(&mut self) -> Option<Toast> {
        self.toasts.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badge::MemoryBadgeView;

    fn push(controller: &mut BadgeController, message: &str) {
        controller.handle_event(BadgeEvent::Push(format!(r#"{{"message":"{message}"}}"#)));
    }

    #[test]
    fn test_snapshot_then_push_then_clear() {
        let mut controller = BadgeController::new();
        let mut view = MemoryBadgeView::new();

        controller.handle_event(BadgeEvent::CountSnapshot(3));
        controller.render(&mut view);
        assert_eq!(view.text, "3");
        assert!(view.visible);

        push(&mut controller, "hi");
        controller.render(&mut view);
        assert_eq!(view.text, "4");
        assert!(view.visible);

        controller.set_count(0);
        controller.render(&mut view);
        assert!(!view.visible);
    }

    #[test]
    fn test_snapshot_overwrites_earlier_pushes() {
        let mut controller = BadgeController::new();
        let mut view = MemoryBadgeView::new();

        push(&mut controller, "early");
        controller.render(&mut view);
        assert_eq!(view.text, "1");

        controller.handle_event(BadgeEvent::CountSnapshot(5));
        controller.render(&mut view);
        assert_eq!(controller.count(), 5);
        assert_eq!(view.text, "5");
    }

    #[test]
    fn test_n_pushes_after_snapshot() {
        for (c0, n) in [(0u64, 0usize), (0, 3), (2, 1), (10, 25)] {
            let mut controller = BadgeController::with_toast_capacity(64);
            controller.handle_event(BadgeEvent::CountSnapshot(c0));
            for i in 0..n {
                push(&mut controller, &format!("m{i}"));
            }
            assert_eq!(controller.count(), c0 + n as u64);
            assert_eq!(controller.pending_toasts(), n);
        }
    }

    #[test]
    fn test_malformed_push_is_dropped() {
        let mut controller = BadgeController::new();
        controller.handle_event(BadgeEvent::CountSnapshot(2));

        controller.handle_event(BadgeEvent::Push("{not json".to_string()));
        controller.handle_event(BadgeEvent::Push(r#"{"msg":"hi"}"#.to_string()));
        assert_eq!(controller.count(), 2);
        assert_eq!(controller.pending_toasts(), 0);
        assert!(matches!(
            controller.last_error(),
            Some(BadgeError::MalformedMessage(_))
        ));

        // The handler keeps going after a bad payload
        push(&mut controller, "ok");
        assert_eq!(controller.count(), 3);
    }

    #[test]
    fn test_fetch_failure_keeps_count() {
        let mut controller = BadgeController::new();
        push(&mut controller, "a");
        controller.handle_event(BadgeEvent::FetchFailed(BadgeError::FetchFailure(
            "server returned 500".to_string(),
        )));
        assert_eq!(controller.count(), 1);
        assert_eq!(
            controller.last_error(),
            Some(&BadgeError::FetchFailure("server returned 500".to_string()))
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut controller = BadgeController::new();
        let mut view = MemoryBadgeView::new();
        controller.apply_count_snapshot(8);

        controller.render(&mut view);
        let after_first = view.clone();
        controller.render(&mut view);
        assert_eq!(view, after_first);
        assert_eq!(view.writes, 1);
    }

    #[test]
    fn test_render_hidden_for_zero() {
        let controller = BadgeController::new();
        let mut view = MemoryBadgeView::new();
        view.visible = true;
        controller.render(&mut view);
        assert!(!view.visible);
        assert_eq!(view.writes, 0);
    }

    #[test]
    fn test_stream_lifecycle() {
        let mut controller = BadgeController::new();
        assert_eq!(controller.stream_state(), StreamState::Connecting);

        controller.handle_event(BadgeEvent::StreamStateChanged(StreamState::Open));
        assert_eq!(controller.stream_state(), StreamState::Open);

        controller.handle_event(BadgeEvent::StreamClosed {
            code: 1006,
            reason: "Connection error".to_string(),
            reconnecting: false,
        });
        assert_eq!(controller.stream_state(), StreamState::Closed);
        assert_eq!(
            controller.last_error(),
            Some(&BadgeError::StreamClosed {
                code: 1006,
                reason: "Connection error".to_string()
            })
        );
    }

    #[test]
    fn test_toasts_follow_pushes() {
        let mut controller = BadgeController::with_toast_capacity(2);
        push(&mut controller, "one");
        push(&mut controller, "two");
        push(&mut controller, "three");

        assert_eq!(controller.count(), 3);
        assert_eq!(controller.next_toast().map(|t| t.message), Some("two".to_string()));
        assert_eq!(controller.next_toast().map(|t| t.message), Some("three".to_string()));
        assert!(controller.next_toast().is_none());
    }
}
