//! The post table and its mutations.

use crate::error::{FeedError, Result};
use crate::storage::KeyValueStorage;
use crate::subscriptions::{
    PostChange, SubscriptionConfig, SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
use crate::types::{Post, PostDraft, PostId, PostPatch, Timestamp, WalletAddress};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Post store configuration.
#[derive(Clone, Debug)]
pub struct PostStoreConfig {
    /// Maximum activity length in characters.
    pub max_activity_chars: usize,

    /// Storage key the table is mirrored under (when storage is attached).
    pub storage_key: String,
}

impl Default for PostStoreConfig {
    fn default() -> Self {
        Self {
            max_activity_chars: 280,
            storage_key: "lifefeed-posts".to_string(),
        }
    }
}

struct Table {
    /// Insertion order (oldest first).
    posts: Vec<Post>,
    /// Last assigned creation timestamp; new posts always get a larger one.
    last_timestamp: Timestamp,
}

/// In-memory post table, optionally mirrored into a [`KeyValueStorage`].
///
/// Validation and ownership failures leave the table untouched.
pub struct PostStore {
    config: PostStoreConfig,
    table: RwLock<Table>,
    storage: Option<Arc<dyn KeyValueStorage>>,
    subscriptions: SubscriptionManager,
}

impl PostStore {
    /// Create an empty, purely in-memory store.
    pub fn new(config: PostStoreConfig) -> Self {
        Self {
            config,
            table: RwLock::new(Table {
                posts: Vec::new(),
                last_timestamp: Timestamp(0),
            }),
            storage: None,
            subscriptions: SubscriptionManager::new(),
        }
    }

    /// Open a store mirrored into `storage`, loading any saved table.
    pub fn open(config: PostStoreConfig, storage: Arc<dyn KeyValueStorage>) -> Result<Self> {
        let posts: Vec<Post> = match storage.get(&config.storage_key)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        let last_timestamp = posts
            .iter()
            .map(|p| p.timestamp)
            .max()
            .unwrap_or(Timestamp(0));

        info!(posts = posts.len(), key = %config.storage_key, "opened post store");

        Ok(Self {
            config,
            table: RwLock::new(Table {
                posts,
                last_timestamp,
            }),
            storage: Some(storage),
            subscriptions: SubscriptionManager::new(),
        })
    }

    // --- Queries ---

    /// All posts, newest first.
    pub fn list(&self) -> Vec<Post> {
        let table = self.table.read();
        let mut posts = table.posts.clone();
        posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        posts
    }

    pub fn get(&self, id: &PostId) -> Option<Post> {
        self.table.read().posts.iter().find(|p| &p.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.table.read().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // --- Mutations ---

    /// Create a post from a draft.
    pub fn create(&self, draft: PostDraft) -> Result<Post> {
        if draft.user_name.trim().is_empty() {
            return Err(FeedError::Validation("Missing required fields".into()));
        }
        self.validate_activity(&draft.activity)?;

        let post = {
            let mut table = self.table.write();
            let now = Timestamp::now();
            let timestamp = if now > table.last_timestamp {
                now
            } else {
                Timestamp(table.last_timestamp.0 + 1)
            };
            table.last_timestamp = timestamp;

            let post = Post {
                id: PostId(timestamp.0.to_string()),
                wallet_address: draft.wallet_address,
                user_name: draft.user_name,
                activity: draft.activity,
                category: draft.category,
                image: draft.image,
                timestamp,
                nft_count: 0,
                usdc_earned: 0,
            };
            table.posts.push(post.clone());
            self.persist(&table);
            post
        };

        debug!(post_id = %post.id, "created post");
        self.subscriptions
            .broadcast_post_change(&post.id, PostChange::Created);
        Ok(post)
    }

    /// Edit a post owned by `owner`.
    pub fn update(&self, id: &PostId, owner: &WalletAddress, patch: PostPatch) -> Result<Post> {
        if let Some(activity) = &patch.activity {
            self.validate_activity(activity)?;
        }

        let post = {
            let mut table = self.table.write();
            let post = Self::find_mut(&mut table, id)?;
            Self::check_owner(post, owner)?;

            if let Some(activity) = patch.activity {
                post.activity = activity;
            }
            if let Some(category) = patch.category {
                post.category = category;
            }
            if let Some(image) = patch.image {
                post.image = image;
            }
            let post = post.clone();
            self.persist(&table);
            post
        };

        self.subscriptions
            .broadcast_post_change(&post.id, PostChange::Updated);
        Ok(post)
    }

    /// Delete a post owned by `owner`.
    pub fn delete(&self, id: &PostId, owner: &WalletAddress) -> Result<()> {
        {
            let mut table = self.table.write();
            let post = Self::find_mut(&mut table, id)?;
            Self::check_owner(post, owner)?;
            table.posts.retain(|p| &p.id != id);
            self.persist(&table);
        }

        debug!(post_id = %id, "deleted post");
        self.subscriptions.broadcast_post_change(id, PostChange::Deleted);
        Ok(())
    }

    /// Record a tip of `amount_cents` on a post.
    pub fn increment_tip(&self, id: &PostId, amount_cents: u64) -> Result<Post> {
        if amount_cents == 0 {
            return Err(FeedError::Validation("Valid USDC amount is required".into()));
        }

        let post = {
            let mut table = self.table.write();
            let post = Self::find_mut(&mut table, id)?;
            post.usdc_earned = post
                .usdc_earned
                .checked_add(amount_cents)
                .ok_or_else(|| FeedError::Validation("Tip total overflow".into()))?;
            let post = post.clone();
            self.persist(&table);
            post
        };

        self.subscriptions.broadcast_post_change(
            id,
            PostChange::Tipped {
                amount: amount_cents,
            },
        );
        Ok(post)
    }

    /// Record one more collectible minted for a post.
    pub fn increment_mint_count(&self, id: &PostId) -> Result<Post> {
        let post = {
            let mut table = self.table.write();
            let post = Self::find_mut(&mut table, id)?;
            post.nft_count = post
                .nft_count
                .checked_add(1)
                .ok_or_else(|| FeedError::Validation("Mint count overflow".into()))?;
            let post = post.clone();
            self.persist(&table);
            post
        };

        self.subscriptions.broadcast_post_change(id, PostChange::Minted);
        Ok(post)
    }

    // --- Subscriptions ---

    /// Observe changes to the table.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        self.subscriptions.subscribe(config)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id);
    }

    // --- Internals ---

    fn validate_activity(&self, activity: &str) -> Result<()> {
        if activity.trim().is_empty() {
            return Err(FeedError::Validation("Missing required fields".into()));
        }
        if activity.chars().count() > self.config.max_activity_chars {
            return Err(FeedError::Validation(format!(
                "Activity must be {} characters or less",
                self.config.max_activity_chars
            )));
        }
        Ok(())
    }

    fn find_mut<'a>(table: &'a mut Table, id: &PostId) -> Result<&'a mut Post> {
        table
            .posts
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| FeedError::PostNotFound(id.clone()))
    }

    fn check_owner(post: &Post, owner: &WalletAddress) -> Result<()> {
        if post.is_authored_by(Some(owner)) {
            Ok(())
        } else {
            Err(FeedError::Unauthorized)
        }
    }

    /// Mirror the table into storage. The in-memory table stays authoritative.
    fn persist(&self, table: &Table) {
        let Some(storage) = &self.storage else {
            return;
        };
        let result = serde_json::to_string(&table.posts)
            .map_err(FeedError::from)
            .and_then(|raw| storage.set(&self.config.storage_key, &raw));
        if let Err(error) = result {
            warn!(%error, key = %self.config.storage_key, "failed to persist posts");
        }
    }
}

impl Drop for PostStore {
    fn drop(&mut self) {
        self.subscriptions.close_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::subscriptions::{FeedEvent, SubscriptionFilter};
    use crate::types::Category;

    fn alice() -> WalletAddress {
        WalletAddress::from("0xA11CE")
    }

    fn draft(activity: &str) -> PostDraft {
        PostDraft::new(alice(), "alice", activity)
    }

    #[test]
    fn test_create_and_list_newest_first() {
        let store = PostStore::new(PostStoreConfig::default());
        let first = store.create(draft("ran 5k")).unwrap();
        let second = store.create(draft("read a book")).unwrap();

        assert!(second.timestamp > first.timestamp);
        assert_ne!(first.id, second.id);

        let listed = store.list();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
        assert_eq!(listed[0].usdc_earned, 0);
        assert_eq!(listed[0].nft_count, 0);
    }

    #[test]
    fn test_create_validation() {
        let store = PostStore::new(PostStoreConfig::default());

        assert!(matches!(store.create(draft("   ")), Err(FeedError::Validation(_))));
        assert!(matches!(
            store.create(PostDraft::new(alice(), "", "hi")),
            Err(FeedError::Validation(_))
        ));
        assert!(matches!(
            store.create(draft(&"x".repeat(281))),
            Err(FeedError::Validation(_))
        ));
        assert!(store.create(draft(&"x".repeat(280))).is_ok());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_requires_owner() {
        let store = PostStore::new(PostStoreConfig::default());
        let post = store.create(draft("ran 5k")).unwrap();

        let patch = PostPatch {
            activity: Some("ran 10k".into()),
            category: Some(Category::Fitness),
            ..Default::default()
        };

        let err = store
            .update(&post.id, &WalletAddress::from("0xB0B"), patch.clone())
            .unwrap_err();
        assert!(matches!(err, FeedError::Unauthorized));
        assert_eq!(store.get(&post.id).unwrap().activity, "ran 5k");

        // Owner check ignores address case.
        let updated = store
            .update(&post.id, &WalletAddress::from("0xa11ce"), patch)
            .unwrap();
        assert_eq!(updated.activity, "ran 10k");
        assert_eq!(updated.category, Category::Fitness);
    }

    #[test]
    fn test_legacy_post_cannot_be_modified() {
        let store = PostStore::new(PostStoreConfig::default());
        let post = store
            .create(PostDraft {
                user_name: "legacy".into(),
                activity: "old post".into(),
                ..Default::default()
            })
            .unwrap();

        assert!(matches!(
            store.delete(&post.id, &alice()),
            Err(FeedError::Unauthorized)
        ));
    }

    #[test]
    fn test_delete() {
        let store = PostStore::new(PostStoreConfig::default());
        let post = store.create(draft("ran 5k")).unwrap();

        store.delete(&post.id, &alice()).unwrap();
        assert!(store.is_empty());
        assert!(matches!(
            store.delete(&post.id, &alice()),
            Err(FeedError::PostNotFound(_))
        ));
    }

    #[test]
    fn test_counters_only_increase() {
        let store = PostStore::new(PostStoreConfig::default());
        let post = store.create(draft("ran 5k")).unwrap();

        assert!(matches!(
            store.increment_tip(&post.id, 0),
            Err(FeedError::Validation(_))
        ));
        store.increment_tip(&post.id, 250).unwrap();
        let tipped = store.increment_tip(&post.id, 100).unwrap();
        assert_eq!(tipped.usdc_earned, 350);

        let minted = store.increment_mint_count(&post.id).unwrap();
        assert_eq!(minted.nft_count, 1);

        assert!(matches!(
            store.increment_mint_count(&PostId::from("missing")),
            Err(FeedError::PostNotFound(_))
        ));
    }

    #[test]
    fn test_mutations_broadcast() {
        let store = PostStore::new(PostStoreConfig::default());
        let handle = store.subscribe(SubscriptionConfig {
            filter: SubscriptionFilter::posts(),
            ..Default::default()
        });

        let post = store.create(draft("ran 5k")).unwrap();
        store.increment_tip(&post.id, 500).unwrap();
        let _ = store.create(draft(""));

        let events = handle.drain();
        assert_eq!(
            events,
            vec![
                FeedEvent::PostsChanged {
                    post_id: post.id.clone(),
                    change: PostChange::Created
                },
                FeedEvent::PostsChanged {
                    post_id: post.id.clone(),
                    change: PostChange::Tipped { amount: 500 }
                },
            ]
        );
    }

    #[test]
    fn test_reopen_from_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let id = {
            let store = PostStore::open(PostStoreConfig::default(), storage.clone()).unwrap();
            let post = store.create(draft("ran 5k")).unwrap();
            store.increment_mint_count(&post.id).unwrap();
            post.id
        };

        let store = PostStore::open(PostStoreConfig::default(), storage).unwrap();
        let post = store.get(&id).unwrap();
        assert_eq!(post.nft_count, 1);

        let newer = store.create(draft("again")).unwrap();
        assert!(newer.timestamp > post.timestamp);
    }
}
