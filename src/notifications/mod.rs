//! Notification inbox, delivery and the engine tying them together.
//!
//! - [`Inbox`]: ordered, persisted notification records
//! - [`AlertHost`]: system-level alerts, gated by user consent
//! - [`SoundSink`]: short tones keyed by notification kind
//! - [`NotificationEngine`]: turns post snapshots into inbox entries
//!
//! # Example
//!
//! ```ignore
//! let storage = Arc::new(FileStorage::open("./profile")?);
//! let mut engine = NotificationEngine::open(
//!     EngineConfig::default(),
//!     EngineServices::headless(storage),
//! );
//!
//! engine.reconcile(&store.list(), Some(&my_address));
//! println!("{} unread", engine.unread_count());
//! engine.close()?;
//! ```

mod delivery;
mod engine;
mod inbox;
mod messages;
mod sound;

pub use delivery::{Alert, AlertHost, NoAlerts, Permission};
pub use engine::{EngineConfig, EngineServices, NotificationEngine};
pub use inbox::Inbox;
pub use messages::notification_for;
pub use sound::{Muted, SoundSink, Tone};
