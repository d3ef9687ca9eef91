//! In-memory notification inbox.

use tracing::debug;

use crate::models::Notification;

/// Notifications in display order (newest first as supplied).
#[derive(Debug, Clone, Default)]
pub struct NotificationInbox {
    items: Vec<Notification>,
}

impl NotificationInbox {
    pub fn new(items: Vec<Notification>) -> Self {
        Self { items }
    }

    pub fn list(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    /// Put a notification at the top of the inbox.
    pub fn push(&mut self, notification: Notification) {
        self.items.insert(0, notification);
    }

    /// Mark one notification read. Returns false for unknown ids.
    pub fn mark_as_read(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_as_read(&mut self) {
        for notification in &mut self.items {
            notification.read = true;
        }
    }

    /// Remove a notification. Returns false for unknown ids.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        let removed = self.items.len() < before;
        if removed {
            debug!(id, "notification deleted");
        }
        removed
    }
}
