//! # IPC Module
//!
//! Inter-process communication between the tracker app and the agent.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.4.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: CHECK_REMINDERS message for app-driven evaluation passes
//! - 1.0.0: Initial IPC implementation with Unix socket protocol

pub mod protocol;
pub mod server;

pub use protocol::{encode_message, AgentEvent, AppMessage};
pub use server::IpcServer;
