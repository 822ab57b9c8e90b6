//! # Reminders Feature
//!
//! Periodic evaluation of user-defined reminders with per-day deduplication.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.2.0: Fired-log pruning folded into the evaluation pass
//! - 1.1.0: Evaluator split from the tick loop for direct IPC-triggered checks
//! - 1.0.0: Initial release with time/day matching and dedup log

pub mod evaluator;
pub mod schedule;
pub mod scheduler;

pub use evaluator::ReminderEvaluator;
pub use schedule::Reminder;
pub use scheduler::ReminderScheduler;
