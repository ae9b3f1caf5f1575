//! Append-only activity event log.

use crate::types::{PostId, Timestamp, WalletAddress};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position in the event log.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct EventSequence(pub u64);

impl EventSequence {
    pub fn next(self) -> Self {
        EventSequence(self.0 + 1)
    }
}

impl fmt::Debug for EventSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seq({})", self.0)
    }
}

/// What was observed about a post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityEventKind {
    /// Counters recorded without firing: first sighting of a post, or a
    /// counter that went down.
    Baseline { tip_total: u64, mint_count: u64 },

    /// A post that was not in the previous snapshot.
    NewPost {
        author: Option<WalletAddress>,
        user_name: String,
        excerpt: String,
        /// Whether `excerpt` was cut short.
        truncated: bool,
        /// Authored by the observer.
        own: bool,
    },

    /// The tip total grew by `delta` cents to `total`.
    TipAccrued {
        delta: u64,
        total: u64,
        own_post: bool,
        recipient: String,
    },

    /// The mint count grew by `delta` to `total`.
    Minted {
        delta: u64,
        total: u64,
        own_post: bool,
        recipient: String,
    },
}

/// A single entry in the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub sequence: EventSequence,
    pub post_id: PostId,
    pub timestamp: Timestamp,
    pub kind: ActivityEventKind,
}

/// Append-only sequence of activity events.
#[derive(Clone, Debug)]
pub struct EventLog {
    events: Vec<ActivityEvent>,
    /// Sequence the next event receives. Never reused, even after compaction.
    next_sequence: EventSequence,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            next_sequence: EventSequence(1),
        }
    }

    /// Append an event, assigning its sequence and timestamp.
    pub fn append(&mut self, post_id: PostId, kind: ActivityEventKind) -> &ActivityEvent {
        let event = ActivityEvent {
            sequence: self.next_sequence,
            post_id,
            timestamp: Timestamp::now(),
            kind,
        };
        self.next_sequence = self.next_sequence.next();
        self.events.push(event);
        &self.events[self.events.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityEvent> {
        self.events.iter()
    }

    /// Events with sequence >= `from`.
    pub fn iter_from(&self, from: EventSequence) -> impl Iterator<Item = &ActivityEvent> {
        let start = self.events.partition_point(|e| e.sequence < from);
        self.events[start..].iter()
    }

    /// Sequence of the most recent event, if any.
    pub fn head(&self) -> Option<EventSequence> {
        self.events.last().map(|e| e.sequence)
    }

    /// Replace the history with `baselines`, one event per post.
    ///
    /// Sequences keep counting from where they were.
    pub(crate) fn compact_to<I>(&mut self, baselines: I)
    where
        I: IntoIterator<Item = (PostId, u64, u64)>,
    {
        self.events.clear();
        for (post_id, tip_total, mint_count) in baselines {
            self.append(
                post_id,
                ActivityEventKind::Baseline {
                    tip_total,
                    mint_count,
                },
            );
        }
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
