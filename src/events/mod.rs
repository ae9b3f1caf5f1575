//! Activity events derived from successive post snapshots.
//!
//! Every observation the reconciler makes is appended to an [`EventLog`].
//! Per-post [`Baselines`] are a fold over that log, so "the first sighting
//! of a post never fires" is simply: the first event for a post is a
//! `Baseline` event, and `Baseline` events never become notifications.

mod baselines;
mod log;

pub use baselines::{Baseline, Baselines};
pub use log::{ActivityEvent, ActivityEventKind, EventLog, EventSequence};
