//! Notification side channel for displaying success and error messages to users.
//!
//! Controllers decide what happened and hand a [Notification] to a [Notifier];
//! how the notification is shown (toast, log line, nothing) is up to the UI.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Notification styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    /// A neutral or confirming message.
    #[default]
    Default,
    /// A failure the user should notice.
    Destructive,
}

/// A user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Short headline, e.g. "Category created".
    pub title: String,
    /// One or two sentences of detail.
    pub description: String,
    /// How the message should be styled.
    #[serde(default)]
    pub variant: NotificationVariant,
}

impl Notification {
    /// Create a confirming notification.
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    /// Create a destructive notification.
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }

    /// Whether this notification reports a failure.
    pub fn is_destructive(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}

/// Receives notifications. Fire and forget: nothing is returned to the sender.
pub trait Notifier: Send + Sync {
    /// Show `notification` to the user.
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
///
/// Useful for headless binaries where there is no UI to show them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            NotificationVariant::Default => {
                tracing::info!("{}: {}", notification.title, notification.description)
            }
            NotificationVariant::Destructive => {
                tracing::warn!("{}: {}", notification.title, notification.description)
            }
        }
    }
}

/// Keeps every notification it receives, in order.
///
/// UIs that poll for toasts and tests use this to inspect what was emitted.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Create an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the notifications received so far.
    pub fn notifications(&self) -> Vec<Notification> {
        match self.notifications.lock() {
            Ok(notifications) => notifications.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Remove and return the notifications received so far.
    pub fn drain(&self) -> Vec<Notification> {
        match self.notifications.lock() {
            Ok(mut notifications) => std::mem::take(&mut *notifications),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// The number of destructive notifications received so far.
    pub fn destructive_count(&self) -> usize {
        self.notifications()
            .iter()
            .filter(|notification| notification.is_destructive())
            .count()
    }

    /// The number of confirming notifications received so far.
    pub fn success_count(&self) -> usize {
        self.notifications()
            .iter()
            .filter(|notification| !notification.is_destructive())
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        match self.notifications.lock() {
            Ok(mut notifications) => notifications.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
