//! Subscription system for live feed updates.
//!
//! This module provides in-process subscriptions to:
//! - Post store changes (create, edit, delete, tip, mint)
//! - Inbox changes (with re-derived total and unread counts)
//!
//! Buffers are bounded; a subscriber that stops draining is dropped.
//!
//! # Example
//!
//! ```ignore
//! let handle = store.subscribe(SubscriptionConfig {
//!     filter: SubscriptionFilter::posts(),
//!     ..Default::default()
//! });
//!
//! while let Ok(event) = handle.recv() {
//!     match event {
//!         FeedEvent::PostsChanged { .. } => engine.reconcile(&store.list(), me.as_ref()),
//!         FeedEvent::Dropped { .. } => break,
//!         _ => {}
//!     };
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, FeedEvent, PostChange, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId,
};
