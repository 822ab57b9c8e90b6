//! # Features Module
//!
//! Feature modules for the tracker agent.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod notifications;
pub mod reminders;

// Re-export commonly used items
pub use notifications::{IpcNotifier, NotificationRequest, Notifier};
pub use reminders::{Reminder, ReminderEvaluator, ReminderScheduler};
