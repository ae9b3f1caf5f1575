//! Out-of-band alert delivery (system notifications).

use crate::error::DeliveryError;
use crate::types::{Notification, NotificationId};
use std::time::Duration;

/// Consent state for system alerts, as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// Not asked yet.
    Prompt,
    /// The host has no alert capability at all.
    Unsupported,
}

/// A system-level alert mirroring one notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    /// Alerts with the same tag replace each other instead of stacking.
    pub tag: NotificationId,
    pub title: String,
    pub body: String,
    pub icon: String,
    /// Stay on screen until the user dismisses the alert.
    pub require_interaction: bool,
    /// Close automatically after this long; `None` when interaction is required.
    pub auto_dismiss: Option<Duration>,
}

impl Alert {
    pub fn for_notification(notification: &Notification, icon: &str, auto_dismiss: Duration) -> Self {
        let require_interaction = notification.kind.requires_interaction();
        Self {
            tag: notification.id.clone(),
            title: notification.title.clone(),
            body: notification.message.clone(),
            icon: icon.to_string(),
            require_interaction,
            auto_dismiss: if require_interaction {
                None
            } else {
                Some(auto_dismiss)
            },
        }
    }
}

/// The environment that shows system alerts.
///
/// Implementations schedule `auto_dismiss` themselves.
pub trait AlertHost: Send + Sync {
    /// Current consent state, without prompting.
    fn permission(&self) -> Permission;

    /// Ask the user for consent. Blocks until they answer.
    fn request_permission(&self) -> Permission;

    fn show(&self, alert: &Alert) -> Result<(), DeliveryError>;

    fn dismiss(&self, tag: &NotificationId);

    /// Bring the application window to the front.
    fn focus_app(&self);
}

/// Host without alert support.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAlerts;

impl AlertHost for NoAlerts {
    fn permission(&self) -> Permission {
        Permission::Unsupported
    }

    fn request_permission(&self) -> Permission {
        Permission::Unsupported
    }

    fn show(&self, _alert: &Alert) -> Result<(), DeliveryError> {
        Err(DeliveryError::Unsupported)
    }

    fn dismiss(&self, _tag: &NotificationId) {}

    fn focus_app(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NotificationKind, Timestamp};

    fn note(kind: NotificationKind) -> Notification {
        Notification {
            id: NotificationId::from("notif_1_x"),
            kind,
            title: "title".into(),
            message: "body".into(),
            timestamp: Timestamp(1),
            read: false,
            data: None,
        }
    }

    #[test]
    fn test_money_alerts_stay_until_dismissed() {
        for kind in [NotificationKind::Tip, NotificationKind::Mint] {
            let alert = Alert::for_notification(&note(kind), "/icon.png", Duration::from_secs(5));
            assert!(alert.require_interaction);
            assert_eq!(alert.auto_dismiss, None);
        }
    }

    #[test]
    fn test_other_alerts_auto_dismiss() {
        let alert = Alert::for_notification(
            &note(NotificationKind::Activity),
            "/icon.png",
            Duration::from_secs(5),
        );
        assert!(!alert.require_interaction);
        assert_eq!(alert.auto_dismiss, Some(Duration::from_secs(5)));
        assert_eq!(alert.tag, NotificationId::from("notif_1_x"));
        assert_eq!(alert.body, "body");
    }
}
