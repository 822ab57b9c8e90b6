//! # Configuration
//!
//! Environment-driven configuration for the agent process.
//!
//! Every value has a default so the agent can run with an empty environment;
//! `.env` files are honored via `dotenvy` in the binary before this is read.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Check interval moved from hardcoded constant to env var
//! - 1.0.0: Initial creation with database and socket paths

use log::warn;
use std::time::Duration;

/// Default SQLite database path
pub const DEFAULT_DB_PATH: &str = "tracker-agent.db";

/// Default Unix socket path for app <-> agent communication
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/tracker-agent.sock";

/// Default reminder check cadence in seconds
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 60;

/// Runtime configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file backing the persistence adapter
    pub db_path: String,
    /// Unix socket path the IPC server listens on
    pub socket_path: String,
    /// How often the scheduler runs an evaluation pass
    pub check_interval: Duration,
}

impl Config {
    /// Resolve configuration from the process environment.
    ///
    /// Unset variables fall back to defaults. A malformed
    /// `TRACKER_AGENT_CHECK_INTERVAL` falls back with a warning rather than
    /// aborting startup.
    pub fn from_env() -> Self {
        let db_path =
            std::env::var("TRACKER_AGENT_DB").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());

        let socket_path = std::env::var("TRACKER_AGENT_SOCKET")
            .unwrap_or_else(|_| DEFAULT_SOCKET_PATH.to_string());

        let check_interval = match std::env::var("TRACKER_AGENT_CHECK_INTERVAL") {
            Ok(raw) => parse_interval_secs(&raw).unwrap_or_else(|| {
                warn!(
                    "Invalid TRACKER_AGENT_CHECK_INTERVAL {raw:?}, using default of {DEFAULT_CHECK_INTERVAL_SECS}s"
                );
                Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS)
            }),
            Err(_) => Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS),
        };

        Config {
            db_path,
            socket_path,
            check_interval,
        }
    }
}

/// Parse a positive whole number of seconds into a `Duration`.
fn parse_interval_secs(raw: &str) -> Option<Duration> {
    let secs: u64 = raw.trim().parse().ok()?;
    if secs == 0 {
        return None;
    }
    Some(Duration::from_secs(secs))
}
