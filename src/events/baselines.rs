//! Last-seen counters per post, derived from the event log.

use super::log::{ActivityEvent, ActivityEventKind, EventLog};
use crate::types::PostId;
use std::collections::HashMap;

/// Last recorded tip total and mint count of a post.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Baseline {
    pub tip_total: u64,
    pub mint_count: u64,
}

/// Baselines for every post seen so far.
///
/// Always equal to `Baselines::replay` of the log it was built alongside.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Baselines {
    by_post: HashMap<PostId, Baseline>,
}

impl Baselines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild baselines by folding over the whole log.
    pub fn replay(log: &EventLog) -> Self {
        let mut baselines = Self::new();
        for event in log.iter() {
            baselines.apply(event);
        }
        baselines
    }

    /// Fold one event in.
    pub fn apply(&mut self, event: &ActivityEvent) {
        match &event.kind {
            ActivityEventKind::Baseline {
                tip_total,
                mint_count,
            } => {
                self.by_post.insert(
                    event.post_id.clone(),
                    Baseline {
                        tip_total: *tip_total,
                        mint_count: *mint_count,
                    },
                );
            }
            ActivityEventKind::TipAccrued { total, .. } => {
                self.by_post
                    .entry(event.post_id.clone())
                    .or_default()
                    .tip_total = *total;
            }
            ActivityEventKind::Minted { total, .. } => {
                self.by_post
                    .entry(event.post_id.clone())
                    .or_default()
                    .mint_count = *total;
            }
            ActivityEventKind::NewPost { .. } => {}
        }
    }

    pub fn get(&self, post_id: &PostId) -> Option<Baseline> {
        self.by_post.get(post_id).copied()
    }

    pub fn tip_total(&self, post_id: &PostId) -> Option<u64> {
        self.get(post_id).map(|b| b.tip_total)
    }

    pub fn mint_count(&self, post_id: &PostId) -> Option<u64> {
        self.get(post_id).map(|b| b.mint_count)
    }

    pub fn len(&self) -> usize {
        self.by_post.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_post.is_empty()
    }

    /// Keep only the posts for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&PostId) -> bool) {
        self.by_post.retain(|id, _| keep(id));
    }

    /// Entries sorted by post id, for deterministic compaction.
    pub fn entries(&self) -> Vec<(PostId, u64, u64)> {
        let mut entries: Vec<_> = self
            .by_post
            .iter()
            .map(|(id, b)| (id.clone(), b.tip_total, b.mint_count))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_follows_latest_totals() {
        let mut log = EventLog::new();
        let p1 = PostId::from("p1");
        log.append(
            p1.clone(),
            ActivityEventKind::Baseline {
                tip_total: 100,
                mint_count: 1,
            },
        );
        log.append(
            p1.clone(),
            ActivityEventKind::TipAccrued {
                delta: 400,
                total: 500,
                own_post: false,
                recipient: "alice".into(),
            },
        );
        log.append(
            p1.clone(),
            ActivityEventKind::Minted {
                delta: 2,
                total: 3,
                own_post: false,
                recipient: "alice".into(),
            },
        );

        let baselines = Baselines::replay(&log);
        assert_eq!(
            baselines.get(&p1),
            Some(Baseline {
                tip_total: 500,
                mint_count: 3
            })
        );
        assert_eq!(baselines.tip_total(&PostId::from("p2")), None);
    }
}
