//! # Notifications Feature
//!
//! The boundary between reminder evaluation and whatever surface actually
//! renders a notification. The evaluator builds a [`NotificationRequest`]
//! and hands it to a [`Notifier`]; the production notifier broadcasts it to
//! connected app clients over IPC, and tests substitute a recorder.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.4.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: IPC broadcast delivery replaces the log-only notifier
//! - 1.0.0: Initial creation with Notifier trait

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use tokio::sync::broadcast;

use crate::features::reminders::Reminder;
use crate::ipc::AgentEvent;

/// Notification title shown for every reminder
pub const NOTIFICATION_TITLE: &str = "Symptom Tracker";

/// Body text used when a reminder has no label
pub const DEFAULT_BODY: &str = "Time to log your symptoms";

/// Icon reference passed through to the rendering surface
pub const NOTIFICATION_ICON: &str = "/icons/icon.svg";

/// A request to display one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub icon: String,
    /// Tag of the form `reminder-<id>`; rapid repeats with the same tag
    /// collapse into one visible notification on the rendering surface
    pub tag: String,
    pub require_interaction: bool,
}

impl NotificationRequest {
    /// Build the request for a due reminder.
    pub fn for_reminder(reminder: &Reminder) -> Self {
        let body = match reminder.label.as_deref() {
            Some(label) if !label.is_empty() => format!("{label} - {DEFAULT_BODY}"),
            _ => DEFAULT_BODY.to_string(),
        };

        NotificationRequest {
            title: NOTIFICATION_TITLE.to_string(),
            body,
            icon: NOTIFICATION_ICON.to_string(),
            tag: format!("reminder-{}", reminder.id),
            require_interaction: false,
        }
    }
}

/// Displays notifications on behalf of the evaluator.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, request: NotificationRequest) -> Result<()>;
}

/// Production notifier: broadcasts the request as an [`AgentEvent`] to every
/// connected app client. Delivery is fire-and-forget; having no connected
/// client is not an error.
pub struct IpcNotifier {
    events: broadcast::Sender<AgentEvent>,
}

impl IpcNotifier {
    pub fn new(events: broadcast::Sender<AgentEvent>) -> Self {
        IpcNotifier { events }
    }
}

#[async_trait]
impl Notifier for IpcNotifier {
    async fn notify(&self, request: NotificationRequest) -> Result<()> {
        let event = AgentEvent::Notification {
            title: request.title,
            body: request.body,
            icon: request.icon,
            tag: request.tag,
            require_interaction: request.require_interaction,
        };

        if self.events.send(event).is_err() {
            debug!("No connected clients for notification broadcast");
        }
        Ok(())
    }
}
