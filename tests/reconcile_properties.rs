//! Property tests for snapshot diffing.

use lifefeed::{
    ActivityEventKind, Baselines, Category, EngineConfig, EngineServices, MemoryStorage,
    NotificationEngine, NotificationKind, Post, PostId, Reconciler, Timestamp, WalletAddress,
};
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

fn post(id: usize, tip: u64, mint: u64) -> Post {
    Post {
        id: PostId(format!("p{}", id)),
        wallet_address: Some(WalletAddress(format!("0x{:x}", id))),
        user_name: format!("user{}", id),
        activity: format!("activity {}", id),
        category: Category::Other,
        image: None,
        timestamp: Timestamp(id as i64),
        nft_count: mint,
        usdc_earned: tip,
    }
}

/// A sequence of snapshots over up to 4 posts; each post may be absent.
fn snapshots() -> impl Strategy<Value = Vec<Vec<Option<(u64, u64)>>>> {
    prop::collection::vec(
        prop::collection::vec(prop::option::of((0u64..2_000, 0u64..20)), 4),
        1..12,
    )
}

fn materialize(snapshot: &[Option<(u64, u64)>]) -> Vec<Post> {
    snapshot
        .iter()
        .enumerate()
        .rev()
        .filter_map(|(i, slot)| slot.map(|(tip, mint)| post(i, tip, mint)))
        .collect()
}

proptest! {
    #[test]
    fn first_sighting_never_fires_and_tips_match_deltas(seq in snapshots()) {
        let mut reconciler = Reconciler::default();
        let mut last_seen: HashMap<PostId, u64> = HashMap::new();

        for snapshot in &seq {
            let posts = materialize(snapshot);
            let events = reconciler.observe(&posts, None);

            for p in &posts {
                let tip_events: Vec<u64> = events
                    .iter()
                    .filter(|e| e.post_id == p.id)
                    .filter_map(|e| match e.kind {
                        ActivityEventKind::TipAccrued { delta, .. } => Some(delta),
                        _ => None,
                    })
                    .collect();

                match last_seen.get(&p.id) {
                    None => prop_assert!(tip_events.is_empty()),
                    Some(&prev) if p.usdc_earned > prev => {
                        prop_assert_eq!(tip_events, vec![p.usdc_earned - prev]);
                    }
                    Some(_) => prop_assert!(tip_events.is_empty()),
                }

                prop_assert_eq!(reconciler.baselines().tip_total(&p.id), Some(p.usdc_earned));
                prop_assert_eq!(reconciler.baselines().mint_count(&p.id), Some(p.nft_count));
                last_seen.insert(p.id.clone(), p.usdc_earned);
            }

            prop_assert_eq!(&Baselines::replay(reconciler.events()), reconciler.baselines());
        }
    }

    #[test]
    fn mark_all_read_and_clear_all(seq in snapshots()) {
        let mut engine = NotificationEngine::open(
            EngineConfig::default(),
            EngineServices::headless(Arc::new(MemoryStorage::new())),
        );
        for snapshot in &seq {
            engine.reconcile(&materialize(snapshot), None);
        }

        let total = engine.notifications().len();
        engine.mark_all_read();
        prop_assert_eq!(engine.notifications().len(), total);
        prop_assert_eq!(engine.unread_count(), 0);

        engine.clear_all();
        prop_assert_eq!(engine.notifications().len(), 0);
        engine.clear_all();
        prop_assert_eq!(engine.notifications().len(), 0);
    }

    #[test]
    fn inbox_round_trips_through_storage(seq in snapshots()) {
        let storage = MemoryStorage::new();
        let saved = {
            let mut engine = NotificationEngine::open(
                EngineConfig::default(),
                EngineServices::headless(Arc::new(storage.clone())),
            );
            for snapshot in &seq {
                engine.reconcile(&materialize(snapshot), None);
            }
            if let Some(first) = engine.notifications().first().map(|n| n.id.clone()) {
                engine.mark_read(&first);
            }
            engine.notifications().to_vec()
        };

        let reopened = NotificationEngine::open(
            EngineConfig::default(),
            EngineServices::headless(Arc::new(storage)),
        );
        prop_assert_eq!(reopened.notifications(), saved.as_slice());
    }
}

#[test]
fn test_scenario_single_tip() {
    let mut engine = NotificationEngine::open(
        EngineConfig::default(),
        EngineServices::headless(Arc::new(MemoryStorage::new())),
    );

    engine.reconcile(&[post(1, 0, 0)], None);
    let ids = engine.reconcile(&[post(1, 500, 0)], None);

    assert_eq!(ids.len(), 1);
    let n = engine.get(&ids[0]).unwrap();
    assert_eq!(n.kind, NotificationKind::Tip);
    assert_eq!(n.data.as_ref().unwrap().amount, Some(500));
}
