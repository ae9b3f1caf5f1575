//! Subscription manager for broadcasting feed events.

use crate::error::{FeedError, Result};
use crate::types::PostId;
use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::types::{
    DropReason, FeedEvent, PostChange, SubscriptionConfig, SubscriptionHandle, SubscriptionId,
};

/// Internal subscription state.
struct Subscription {
    config: SubscriptionConfig,
    sender: Sender<FeedEvent>,
}

impl Subscription {
    /// Try to send an event. Returns false if buffer is full (subscriber will be dropped).
    fn try_send(&self, event: FeedEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(crossbeam_channel::TrySendError::Full(_)) => false,
            Err(crossbeam_channel::TrySendError::Disconnected(_)) => false,
        }
    }

    fn wants(&self, event: &FeedEvent) -> bool {
        match event {
            FeedEvent::PostsChanged { .. } => self.config.filter.include_posts,
            FeedEvent::InboxChanged { .. } => self.config.filter.include_inbox,
            FeedEvent::Dropped { .. } => true,
        }
    }
}

/// Manages subscriptions and broadcasts events.
pub struct SubscriptionManager {
    /// Active subscriptions by ID.
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
}

impl SubscriptionManager {
    /// Create a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new subscription.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size.max(1));

        self.subscriptions
            .write()
            .insert(id, Subscription { config, sender });

        SubscriptionHandle { id, receiver }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut subs = self.subscriptions.write();
        if let Some(sub) = subs.remove(&id) {
            // Send dropped event (best effort)
            let _ = sub.sender.try_send(FeedEvent::Dropped {
                reason: DropReason::Unsubscribed,
            });
        }
    }

    /// Drop every subscription, telling each one the publisher is gone.
    pub fn close_all(&self) {
        let mut subs = self.subscriptions.write();
        for (_, sub) in subs.drain() {
            let _ = sub.sender.try_send(FeedEvent::Dropped {
                reason: DropReason::Closed,
            });
        }
    }

    /// Get subscription count.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    // --- Broadcasting ---

    /// Broadcast a post store change.
    pub fn broadcast_post_change(&self, post_id: &PostId, change: PostChange) {
        self.broadcast(FeedEvent::PostsChanged {
            post_id: post_id.clone(),
            change,
        });
    }

    /// Broadcast re-derived inbox counts.
    pub fn broadcast_inbox(&self, total: usize, unread: usize) {
        self.broadcast(FeedEvent::InboxChanged { total, unread });
    }

    /// Send an event directly to one subscription (initial state on subscribe).
    ///
    /// Events the subscription's filter excludes are skipped.
    pub fn send_to(&self, id: SubscriptionId, event: FeedEvent) -> Result<()> {
        let mut subs = self.subscriptions.write();
        let delivered = subs
            .get(&id)
            .filter(|sub| sub.wants(&event))
            .map(|sub| sub.try_send(event));
        match delivered {
            Some(true) | None => Ok(()),
            Some(false) => {
                subs.remove(&id);
                Err(FeedError::SubscriptionDropped)
            }
        }
    }

    /// Internal broadcast helper. Drops subscribers that fail to receive.
    fn broadcast(&self, event: FeedEvent) {
        let mut to_remove = Vec::new();

        {
            let subs = self.subscriptions.read();
            for (id, sub) in subs.iter() {
                if sub.wants(&event) && !sub.try_send(event.clone()) {
                    to_remove.push(*id);
                }
            }
        }

        // Remove dropped subscriptions
        if !to_remove.is_empty() {
            let mut subs = self.subscriptions.write();
            for id in to_remove {
                if let Some(sub) = subs.remove(&id) {
                    debug!(subscription = id.0, "dropping slow subscriber");
                    // Try to notify about the drop (might fail, that's ok)
                    let _ = sub.sender.try_send(FeedEvent::Dropped {
                        reason: DropReason::BufferOverflow,
                    });
                }
            }
        }
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}
