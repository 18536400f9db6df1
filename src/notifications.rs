//! Single-slot transient alert state shared by a request's handlers.
//!
//! The store holds at most one notification; the last write wins. Each kind
//! carries its own auto-dismiss delay, after which [`NotificationStore::current_at`]
//! reports nothing.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Error,
    Success,
    Warning,
}

impl NotificationKind {
    /// Delay after which an open notification of this kind closes itself.
    pub const fn dismiss_after(self) -> Duration {
        match self {
            NotificationKind::Error => Duration::from_millis(4000),
            NotificationKind::Success => Duration::from_millis(3000),
            NotificationKind::Warning => Duration::from_millis(4000),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub open: bool,
    pub message: String,
    pub kind: NotificationKind,
}

#[derive(Debug)]
struct Slot {
    notification: Notification,
    shown_at: Instant,
}

/// Cloneable handle to one notification slot.
#[derive(Clone, Debug, Default)]
pub struct NotificationStore {
    slot: Arc<Mutex<Option<Slot>>>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a notification, replacing whatever was shown before.
    pub fn show(&self, message: impl Into<String>, kind: NotificationKind) {
        self.show_at(message, kind, Instant::now());
    }

    pub fn show_at(&self, message: impl Into<String>, kind: NotificationKind, now: Instant) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Slot {
            notification: Notification {
                open: true,
                message: message.into(),
                kind,
            },
            shown_at: now,
        });
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::Error);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::Success);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(message, NotificationKind::Warning);
    }

    pub fn close(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slot.as_mut() {
            slot.notification.open = false;
        }
    }

    /// Notification still open at `now`, honouring the kind's dismiss delay.
    pub fn current_at(&self, now: Instant) -> Option<Notification> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .filter(|slot| slot.notification.open)
            .filter(|slot| {
                now.saturating_duration_since(slot.shown_at)
                    < slot.notification.kind.dismiss_after()
            })
            .map(|slot| slot.notification.clone())
    }

    pub fn current(&self) -> Option<Notification> {
        self.current_at(Instant::now())
    }

    /// Removes and returns the open notification, if any.
    pub fn take(&self) -> Option<Notification> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.take()
            .map(|slot| slot.notification)
            .filter(|notification| notification.open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let store = NotificationStore::new();
        store.error("first");
        store.success("second");
        let current = store.current().expect("open notification");
        assert_eq!(current.message, "second");
        assert_eq!(current.kind, NotificationKind::Success);
    }

    #[test]
    fn error_dismisses_after_four_seconds() {
        let store = NotificationStore::new();
        let start = Instant::now();
        store.show_at("boom", NotificationKind::Error, start);
        assert!(store.current_at(start + Duration::from_millis(3999)).is_some());
        assert!(store.current_at(start + Duration::from_millis(4000)).is_none());
    }

    #[test]
    fn closed_notification_is_not_reported() {
        let store = NotificationStore::new();
        store.warning("careful");
        store.close();
        assert!(store.current().is_none());
        assert!(store.take().is_none());
    }

    #[test]
    fn clones_share_the_slot() {
        let store = NotificationStore::new();
        let handle = store.clone();
        handle.error("shared");
        assert_eq!(store.take().map(|n| n.message).as_deref(), Some("shared"));
        assert!(handle.current().is_none());
    }
}
