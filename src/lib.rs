//! # lifefeed
//!
//! A daily-activity feed where posts accrue stablecoin tips and collectible
//! mints, plus a client-side notification inbox derived from watching the
//! feed change.
//!
//! ## Core Concepts
//!
//! - **Posts**: short activity updates with monotonically growing tip and
//!   mint counters, owned by a wallet address
//! - **Activity events**: an append-only log of what changed between two
//!   observations of the feed
//! - **Baselines**: last-seen counters per post, folded from the event log;
//!   a post's first sighting only records a baseline
//! - **Inbox**: persisted notifications with read state, fed by the events
//!
//! ## Example
//!
//! ```ignore
//! use lifefeed::{EngineConfig, EngineServices, MemoryStorage, NotificationEngine, PostDraft,
//!     PostStore, PostStoreConfig};
//!
//! let store = PostStore::new(PostStoreConfig::default());
//! let mut engine = NotificationEngine::open(
//!     EngineConfig::default(),
//!     EngineServices::headless(Arc::new(MemoryStorage::new())),
//! );
//!
//! let post = store.create(PostDraft::new("0xa11ce", "alice", "Ran 5k"))?;
//! engine.reconcile(&store.list(), Some(&me));
//!
//! store.increment_tip(&post.id, 500)?;
//! engine.reconcile(&store.list(), Some(&me)); // one tip notification, $5.00
//! ```

pub mod api;
pub mod error;
pub mod events;
pub mod notifications;
pub mod posts;
pub mod reconcile;
pub mod storage;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use api::ApiResponse;
pub use error::{DeliveryError, FeedError, Result};
pub use events::{ActivityEvent, ActivityEventKind, Baseline, Baselines, EventLog, EventSequence};
pub use notifications::{
    notification_for, Alert, AlertHost, EngineConfig, EngineServices, Inbox, Muted, NoAlerts,
    NotificationEngine, Permission, SoundSink, Tone,
};
pub use posts::{filter_posts, FeedQuery, PostStore, PostStoreConfig};
pub use reconcile::{Reconciler, ReconcilerConfig};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use subscriptions::{
    DropReason, FeedEvent, PostChange, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, SubscriptionManager,
};
pub use types::*;
