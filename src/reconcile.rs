//! Snapshot diffing: turn successive post lists into activity events.

use crate::events::{ActivityEvent, ActivityEventKind, Baselines, EventLog, EventSequence};
use crate::types::{excerpt, Post, PostId, WalletAddress};
use std::collections::HashSet;
use tracing::debug;

/// Reconciler configuration.
#[derive(Clone, Debug)]
pub struct ReconcilerConfig {
    /// Characters of post text kept in a new-post event.
    pub excerpt_chars: usize,

    /// Compact the event log once it grows past this many events.
    pub max_events: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            excerpt_chars: 50,
            max_events: 10_000,
        }
    }
}

/// Compares each observed post list with the previous one.
///
/// New posts are found by id-set difference, so deletions and reordering
/// between observations do not miscount. New-post detection stays quiet
/// while the previous snapshot is empty, which keeps the initial backlog
/// from flooding the inbox.
pub struct Reconciler {
    config: ReconcilerConfig,
    log: EventLog,
    baselines: Baselines,
    /// Ids of the previous observation, in its order.
    previous: Vec<PostId>,
}

impl Reconciler {
    pub fn new(config: ReconcilerConfig) -> Self {
        Self {
            config,
            log: EventLog::new(),
            baselines: Baselines::new(),
            previous: Vec::new(),
        }
    }

    /// Diff `posts` against the last observation and return the new events.
    pub fn observe(
        &mut self,
        posts: &[Post],
        observer: Option<&WalletAddress>,
    ) -> Vec<ActivityEvent> {
        let first_new = self.log.head().map_or(EventSequence(1), |s| s.next());

        self.detect_new_posts(posts, observer);
        for post in posts {
            self.detect_tips(post, observer);
            self.detect_mints(post, observer);
        }

        self.previous = posts.iter().map(|p| p.id.clone()).collect();

        let emitted: Vec<ActivityEvent> = self.log.iter_from(first_new).cloned().collect();
        self.maybe_compact();
        emitted
    }

    pub fn events(&self) -> &EventLog {
        &self.log
    }

    pub fn baselines(&self) -> &Baselines {
        &self.baselines
    }

    /// Ids seen on the previous observation.
    pub fn previous_snapshot(&self) -> &[PostId] {
        &self.previous
    }

    fn detect_new_posts(&mut self, posts: &[Post], observer: Option<&WalletAddress>) {
        if self.previous.is_empty() {
            return;
        }
        let seen: HashSet<&PostId> = self.previous.iter().collect();
        let fresh: Vec<&Post> = posts.iter().filter(|p| !seen.contains(&p.id)).collect();

        for post in fresh {
            let (text, truncated) = excerpt(&post.activity, self.config.excerpt_chars);
            let own = post.is_authored_by(observer);
            debug!(post_id = %post.id, own, "new post observed");
            self.record(
                post.id.clone(),
                ActivityEventKind::NewPost {
                    author: post.wallet_address.clone(),
                    user_name: post.user_name.clone(),
                    excerpt: text,
                    truncated,
                    own,
                },
            );
        }
    }

    fn detect_tips(&mut self, post: &Post, observer: Option<&WalletAddress>) {
        let current = post.usdc_earned;
        match self.baselines.get(&post.id) {
            None => self.record_baseline(post),
            Some(previous) if current > previous.tip_total => {
                self.record(
                    post.id.clone(),
                    ActivityEventKind::TipAccrued {
                        delta: current - previous.tip_total,
                        total: current,
                        own_post: post.is_authored_by(observer),
                        recipient: post.user_name.clone(),
                    },
                );
            }
            Some(previous) if current < previous.tip_total => {
                debug!(post_id = %post.id, current, previous = previous.tip_total, "tip total went down");
                self.record(
                    post.id.clone(),
                    ActivityEventKind::Baseline {
                        tip_total: current,
                        mint_count: previous.mint_count,
                    },
                );
            }
            Some(_) => {}
        }
    }

    fn detect_mints(&mut self, post: &Post, observer: Option<&WalletAddress>) {
        let current = post.nft_count;
        // A missing baseline was just recorded by detect_tips.
        let Some(previous) = self.baselines.get(&post.id) else {
            return;
        };
        if current > previous.mint_count {
            self.record(
                post.id.clone(),
                ActivityEventKind::Minted {
                    delta: current - previous.mint_count,
                    total: current,
                    own_post: post.is_authored_by(observer),
                    recipient: post.user_name.clone(),
                },
            );
        } else if current < previous.mint_count {
            debug!(post_id = %post.id, current, previous = previous.mint_count, "mint count went down");
            self.record(
                post.id.clone(),
                ActivityEventKind::Baseline {
                    tip_total: previous.tip_total,
                    mint_count: current,
                },
            );
        }
    }

    fn record_baseline(&mut self, post: &Post) {
        self.record(
            post.id.clone(),
            ActivityEventKind::Baseline {
                tip_total: post.usdc_earned,
                mint_count: post.nft_count,
            },
        );
    }

    fn record(&mut self, post_id: PostId, kind: ActivityEventKind) {
        let event = self.log.append(post_id, kind);
        self.baselines.apply(event);
    }

    fn maybe_compact(&mut self) {
        if self.log.len() <= self.config.max_events {
            return;
        }
        let before = self.log.len();
        let live: HashSet<&PostId> = self.previous.iter().collect();
        self.baselines.retain(|id| live.contains(id));
        self.log.compact_to(self.baselines.entries());
        debug!(before, after = self.log.len(), "compacted event log");
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(ReconcilerConfig::default())
    }
}
