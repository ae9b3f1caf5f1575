//! Post table and feed queries.
//!
//! The store is the source of truth for the feed; the notification engine
//! only ever sees the lists it hands out.

mod feed;
mod store;

pub use feed::{filter_posts, FeedQuery};
pub use store::{PostStore, PostStoreConfig};
