//! The notification engine service.

use super::delivery::{Alert, AlertHost, NoAlerts, Permission};
use super::inbox::Inbox;
use super::messages::notification_for;
use super::sound::{Muted, SoundSink, Tone};
use crate::error::Result;
use crate::events::{Baselines, EventLog};
use crate::reconcile::{Reconciler, ReconcilerConfig};
use crate::storage::KeyValueStorage;
use crate::subscriptions::{
    FeedEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
use crate::types::{
    Notification, NotificationId, NotificationInput, Post, Timestamp, WalletAddress,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Engine configuration.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Storage key the inbox is persisted under.
    pub storage_key: String,

    /// Icon shown on system alerts.
    pub alert_icon: String,

    /// How long non-critical system alerts stay up.
    pub auto_dismiss: Duration,

    /// Add a "Notifications Enabled" entry when permission is first granted.
    pub announce_permission: bool,

    /// Snapshot diffing settings.
    pub reconciler: ReconcilerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_key: "lifefeed-notifications".to_string(),
            alert_icon: "/icon.png".to_string(),
            auto_dismiss: Duration::from_secs(5),
            announce_permission: true,
            reconciler: ReconcilerConfig::default(),
        }
    }
}

/// Collaborators the engine drives.
#[derive(Clone)]
pub struct EngineServices {
    pub storage: Arc<dyn KeyValueStorage>,
    pub alerts: Arc<dyn AlertHost>,
    pub sound: Arc<dyn SoundSink>,
}

impl EngineServices {
    /// Storage only: no system alerts, no sound.
    pub fn headless(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            alerts: Arc::new(NoAlerts),
            sound: Arc::new(Muted),
        }
    }

    pub fn with_alerts(mut self, alerts: Arc<dyn AlertHost>) -> Self {
        self.alerts = alerts;
        self
    }

    pub fn with_sound(mut self, sound: Arc<dyn SoundSink>) -> Self {
        self.sound = sound;
        self
    }
}

/// Derives notifications from post snapshots and owns the inbox.
///
/// The in-memory inbox is authoritative. Persistence, system alerts and
/// sounds are side effects: their failures are logged and never returned.
pub struct NotificationEngine {
    config: EngineConfig,
    services: EngineServices,
    inbox: Inbox,
    permission_granted: bool,
    reconciler: Reconciler,
    subscriptions: SubscriptionManager,
    closed: bool,
}

impl NotificationEngine {
    /// Build the engine and seed the inbox from storage.
    ///
    /// An unreadable saved inbox is logged and replaced by an empty one.
    pub fn open(config: EngineConfig, services: EngineServices) -> Self {
        let inbox = match Inbox::load(services.storage.as_ref(), &config.storage_key) {
            Ok(inbox) => inbox,
            Err(error) => {
                warn!(%error, key = %config.storage_key, "could not load saved notifications");
                Inbox::new()
            }
        };
        let permission_granted = services.alerts.permission() == Permission::Granted;

        info!(
            notifications = inbox.len(),
            unread = inbox.unread_count(),
            permission_granted,
            "opened notification engine"
        );

        Self {
            reconciler: Reconciler::new(config.reconciler.clone()),
            config,
            services,
            inbox,
            permission_granted,
            subscriptions: SubscriptionManager::new(),
            closed: false,
        }
    }

    // --- Queries ---

    /// Notifications, newest first.
    pub fn notifications(&self) -> &[Notification] {
        self.inbox.as_slice()
    }

    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.inbox.get(id)
    }

    pub fn unread_count(&self) -> usize {
        self.inbox.unread_count()
    }

    pub fn is_permission_granted(&self) -> bool {
        self.permission_granted
    }

    /// Everything the reconciler has observed.
    pub fn events(&self) -> &EventLog {
        self.reconciler.events()
    }

    pub fn baselines(&self) -> &Baselines {
        self.reconciler.baselines()
    }

    // --- Mutations ---

    /// Add a notification to the top of the inbox.
    pub fn add(&mut self, input: NotificationInput) -> NotificationId {
        let timestamp = Timestamp::now();
        let notification = Notification {
            id: NotificationId::generate(timestamp),
            kind: input.kind,
            title: input.title,
            message: input.message,
            timestamp,
            read: false,
            data: input.data,
        };
        let id = notification.id.clone();

        self.inbox.prepend(notification);
        self.committed();

        if let Some(notification) = self.inbox.get(&id) {
            self.deliver(notification);
            self.play(notification);
        }

        id
    }

    /// Diff `posts` (newest first) against the last observation and add a
    /// notification for every event worth one.
    ///
    /// `observer` is the connected wallet, if any.
    pub fn reconcile(
        &mut self,
        posts: &[Post],
        observer: Option<&WalletAddress>,
    ) -> Vec<NotificationId> {
        let events = self.reconciler.observe(posts, observer);
        debug!(posts = posts.len(), events = events.len(), "reconciled posts");

        events
            .iter()
            .filter_map(notification_for)
            .map(|input| self.add(input))
            .collect()
    }

    /// Returns false if no notification has that id.
    pub fn mark_read(&mut self, id: &NotificationId) -> bool {
        let changed = self.inbox.mark_read(id);
        if changed {
            self.committed();
        }
        changed
    }

    pub fn mark_all_read(&mut self) {
        self.inbox.mark_all_read();
        self.committed();
    }

    /// Returns false if no notification has that id.
    pub fn clear(&mut self, id: &NotificationId) -> bool {
        let removed = self.inbox.remove(id);
        if removed {
            self.committed();
        }
        removed
    }

    pub fn clear_all(&mut self) {
        self.inbox.clear();
        self.committed();
    }

    /// Ask for consent to show system alerts. Returns whether it is granted.
    pub fn request_permission(&mut self) -> bool {
        match self.services.alerts.permission() {
            Permission::Granted => {
                self.permission_granted = true;
                return true;
            }
            Permission::Unsupported => {
                warn!("host does not support system alerts");
                self.permission_granted = false;
                return false;
            }
            Permission::Denied => {
                warn!("system alert permission was denied");
                self.permission_granted = false;
                return false;
            }
            Permission::Prompt => {}
        }

        let granted = self.services.alerts.request_permission() == Permission::Granted;
        self.permission_granted = granted;

        if granted && self.config.announce_permission {
            self.add(NotificationInput::success(
                "Notifications Enabled",
                "You'll now receive real-time alerts for USDC and NFT activity!",
            ));
        }
        granted
    }

    /// The user clicked a system alert.
    pub fn handle_alert_click(&self, tag: &NotificationId) {
        self.services.alerts.focus_app();
        self.services.alerts.dismiss(tag);
    }

    // --- Subscriptions ---

    /// Observe inbox changes. The current counts are sent first.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        let handle = self.subscriptions.subscribe(config);
        let current = FeedEvent::InboxChanged {
            total: self.inbox.len(),
            unread: self.inbox.unread_count(),
        };
        if self.subscriptions.send_to(handle.id, current).is_err() {
            debug!(subscription = handle.id.0, "subscriber dropped before initial state");
        }
        handle
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id);
    }

    // --- Lifecycle ---

    /// Rewrite the persisted inbox, reporting failure.
    pub fn flush(&self) -> Result<()> {
        self.inbox
            .save(self.services.storage.as_ref(), &self.config.storage_key)
    }

    /// Flush and shut down, ending all subscriptions.
    pub fn close(mut self) -> Result<()> {
        let result = self.shutdown();
        info!("closed notification engine");
        result
    }

    /// Runs once; later calls are no-ops.
    fn shutdown(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let result = self.flush();
        self.subscriptions.close_all();
        result
    }

    // --- Side effects ---

    /// Persist and announce the inbox after a mutation.
    fn committed(&self) {
        if let Err(error) = self.flush() {
            warn!(%error, key = %self.config.storage_key, "failed to persist notifications");
        }
        self.subscriptions
            .broadcast_inbox(self.inbox.len(), self.inbox.unread_count());
    }

    fn deliver(&self, notification: &Notification) {
        if !self.permission_granted {
            return;
        }
        let alert = Alert::for_notification(
            notification,
            &self.config.alert_icon,
            self.config.auto_dismiss,
        );
        if let Err(error) = self.services.alerts.show(&alert) {
            warn!(%error, notification_id = %notification.id, "failed to show system alert");
        }
    }

    fn play(&self, notification: &Notification) {
        let tone = Tone::for_kind(notification.kind);
        if let Err(error) = self.services.sound.play(&tone) {
            debug!(%error, kind = ?notification.kind, "could not play notification sound");
        }
    }
}

impl Drop for NotificationEngine {
    fn drop(&mut self) {
        // Best-effort flush on drop
        let _ = self.shutdown();
    }
}
