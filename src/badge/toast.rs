use std::collections::VecDeque;

use crate::badge::{NotificationKind, PushMessage};

/// A transient on-screen message for one push notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: Option<NotificationKind>,
    pub notification_id: Option<u64>,
}

impl From<PushMessage> for Toast {
    fn from(msg: PushMessage) -> Self {
        Self {
            message: msg.message,
            kind: msg.notification_type,
            notification_id: msg.notification_id,
        }
    }
}

/// Bounded FIFO of pending toasts. When full, the oldest toast is dropped.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    capacity: usize,
    items: VecDeque<Toast>,
}

impl ToastQueue {
    pub const DEFAULT_CAPACITY: usize = 16;

    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Queue a toast, returning the one evicted to make room, if any.
    pub fn push(&mut self, toast: Toast) -> Option<Toast> {
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        if let Some(ref old) = evicted {
            log::debug!("Toast queue full, dropping: {}", old.message);
        }
        self.items.push_back(toast);
        evicted
    }

    pub fn pop(&mut self) -> Option<Toast> {
        self.items.pop_front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
