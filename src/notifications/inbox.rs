//! The ordered notification inbox and its persisted form.

use crate::error::Result;
use crate::storage::KeyValueStorage;
use crate::types::{Notification, NotificationId};

/// Notifications, newest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inbox {
    items: Vec<Notification>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<Notification>) -> Self {
        Self { items }
    }

    /// Read the inbox saved under `key`. A missing key is an empty inbox.
    pub fn load(storage: &dyn KeyValueStorage, key: &str) -> Result<Self> {
        match storage.get(key)? {
            Some(raw) => Ok(Self::from_vec(serde_json::from_str(&raw)?)),
            None => Ok(Self::new()),
        }
    }

    /// Rewrite the whole inbox under `key`.
    pub fn save(&self, storage: &dyn KeyValueStorage, key: &str) -> Result<()> {
        let raw = serde_json::to_string(&self.items)?;
        storage.set(key, &raw)
    }

    pub fn prepend(&mut self, notification: Notification) {
        self.items.insert(0, notification);
    }

    /// Returns false if no notification has that id.
    pub fn mark_read(&mut self, id: &NotificationId) -> bool {
        match self.items.iter_mut().find(|n| &n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for n in &mut self.items {
            n.read = true;
        }
    }

    /// Returns false if no notification has that id.
    pub fn remove(&mut self, id: &NotificationId) -> bool {
        let before = self.items.len();
        self.items.retain(|n| &n.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.items.iter().find(|n| &n.id == id)
    }

    pub fn as_slice(&self) -> &[Notification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }
}
