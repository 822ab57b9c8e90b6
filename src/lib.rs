// Core layer - shared configuration
pub mod core;

// Features layer - reminder evaluation and notification delivery
pub mod features;

// Storage layer - named-cache key/value persistence
pub mod storage;

// IPC layer - communication between the agent and the tracker app
pub mod ipc;

// Re-export core config for convenience
pub use self::core::Config;

// Re-export feature items
pub use features::{
    // Notifications
    IpcNotifier, NotificationRequest, Notifier,
    // Reminders
    Reminder, ReminderEvaluator, ReminderScheduler,
};

// Re-export storage items
pub use storage::{MemoryStore, ReminderStore, SqliteStore, Store};

// Re-export IPC items
pub use ipc::{AgentEvent, AppMessage, IpcServer};
