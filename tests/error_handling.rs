//! Error handling and edge case tests.

use lifefeed::{
    FeedError, FileStorage, KeyValueStorage, PostDraft, PostId, PostPatch, PostStore,
    PostStoreConfig, WalletAddress,
};
use std::sync::Arc;
use tempfile::TempDir;

fn owner() -> WalletAddress {
    WalletAddress::from("0xOWNER")
}

// --- Validation Errors ---

#[test]
fn test_oversized_edit_leaves_post_unchanged() {
    let store = PostStore::new(PostStoreConfig::default());
    let post = store.create(PostDraft::new(owner(), "o", "original")).unwrap();

    let result = store.update(
        &post.id,
        &owner(),
        PostPatch {
            activity: Some("y".repeat(281)),
            category: Some(lifefeed::Category::Work),
            ..Default::default()
        },
    );

    assert!(matches!(result, Err(FeedError::Validation(_))));
    assert_eq!(store.get(&post.id).unwrap(), post);
}

#[test]
fn test_custom_activity_limit() {
    let store = PostStore::new(PostStoreConfig {
        max_activity_chars: 10,
        ..Default::default()
    });

    let err = store
        .create(PostDraft::new(owner(), "o", "eleven char"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Validation failed: Activity must be 10 characters or less");
}

#[test]
fn test_limit_counts_characters_not_bytes() {
    let store = PostStore::new(PostStoreConfig::default());
    assert!(store.create(PostDraft::new(owner(), "o", "ü".repeat(280))).is_ok());
}

// --- Missing Resources ---

#[test]
fn test_mutations_on_missing_post() {
    let store = PostStore::new(PostStoreConfig::default());
    let missing = PostId::from("does-not-exist");

    assert!(matches!(
        store.increment_tip(&missing, 100),
        Err(FeedError::PostNotFound(_))
    ));
    assert!(matches!(
        store.update(&missing, &owner(), PostPatch::default()),
        Err(FeedError::PostNotFound(_))
    ));
    assert!(matches!(
        store.delete(&missing, &owner()),
        Err(FeedError::PostNotFound(_))
    ));
}

// --- Tip Overflow ---

#[test]
fn test_tip_overflow_is_rejected() {
    let store = PostStore::new(PostStoreConfig::default());
    let post = store.create(PostDraft::new(owner(), "o", "rich")).unwrap();

    store.increment_tip(&post.id, u64::MAX).unwrap();
    assert!(matches!(
        store.increment_tip(&post.id, 1),
        Err(FeedError::Validation(_))
    ));
    assert_eq!(store.get(&post.id).unwrap().usdc_earned, u64::MAX);
}

// --- Storage Errors ---

#[test]
fn test_corrupt_post_table_fails_open() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::open(dir.path()).unwrap());
    storage.set("lifefeed-posts", "not json").unwrap();

    let result = PostStore::open(PostStoreConfig::default(), storage);
    assert!(matches!(result, Err(FeedError::Deserialization(_))));
}

#[test]
fn test_storage_lock_released_on_drop() {
    let dir = TempDir::new().unwrap();
    {
        let _storage = FileStorage::open(dir.path()).unwrap();
        assert!(matches!(FileStorage::open(dir.path()), Err(FeedError::Locked)));
    }
    assert!(FileStorage::open(dir.path()).is_ok());
}

#[test]
fn test_post_table_survives_reopen_on_disk() {
    let dir = TempDir::new().unwrap();
    let id = {
        let storage = Arc::new(FileStorage::open(dir.path()).unwrap());
        let store = PostStore::open(PostStoreConfig::default(), storage).unwrap();
        let post = store.create(PostDraft::new(owner(), "o", "persisted")).unwrap();
        store.increment_tip(&post.id, 42).unwrap();
        post.id
    };

    let storage = Arc::new(FileStorage::open(dir.path()).unwrap());
    let store = PostStore::open(PostStoreConfig::default(), storage).unwrap();
    assert_eq!(store.get(&id).unwrap().usdc_earned, 42);
}
