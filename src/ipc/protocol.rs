//! # IPC Protocol
//!
//! Message types for app <-> agent communication over Unix socket.
//!
//! Uses length-prefixed JSON framing:
//! - 4 bytes: message length (big-endian u32)
//! - N bytes: JSON payload
//!
//! The app-facing message tags (`SET_REMINDERS`, `CHECK_REMINDERS`) are the
//! app's wire contract and must not be renamed.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::features::reminders::Reminder;

/// Upper bound on a single framed message; a reminder list is a few KB at
/// most, so anything near this is garbage or a framing bug
pub const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

// ============================================================================
// App -> Agent Messages
// ============================================================================

/// Messages the tracker app pushes to the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AppMessage {
    /// Wholesale replacement of the stored reminder list; sent whenever the
    /// app's in-memory list changes
    #[serde(rename = "SET_REMINDERS")]
    SetReminders { reminders: Vec<Reminder> },
    /// Request an immediate evaluation pass, outside the normal cadence
    #[serde(rename = "CHECK_REMINDERS")]
    CheckReminders,
}

// ============================================================================
// Agent -> App Events
// ============================================================================

/// Events broadcast from the agent to connected app clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AgentEvent {
    /// Request to display a local notification
    Notification {
        title: String,
        body: String,
        icon: String,
        tag: String,
        require_interaction: bool,
    },
    /// Keep-alive for connected clients
    Heartbeat { timestamp: i64 },
}

// ============================================================================
// Framing
// ============================================================================

/// Encode a message with its 4-byte length prefix
pub fn encode_message<T: Serialize>(msg: &T) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(msg)?;
    let len = json.len() as u32;
    let mut buf = Vec::with_capacity(4 + json.len());
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(&json);
    Ok(buf)
}

/// Read a length-prefixed message from a reader
pub fn decode_message<T: for<'de> Deserialize<'de>, R: Read>(reader: &mut R) -> Result<T> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_be_bytes(len_buf) as usize;

    if len > MAX_MESSAGE_BYTES {
        return Err(anyhow!("Message too large: {} bytes", len));
    }

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;

    Ok(serde_json::from_slice(&buf)?)
}

/// Write a framed message to a writer
pub fn write_message<T: Serialize, W: Write>(writer: &mut W, msg: &T) -> Result<()> {
    let encoded = encode_message(msg)?;
    writer.write_all(&encoded)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_encode_decode_roundtrip() {
        let event = AgentEvent::Heartbeat { timestamp: 12345 };
        let encoded = encode_message(&event).unwrap();

        let mut cursor = Cursor::new(encoded);
        let decoded: AgentEvent = decode_message(&mut cursor).unwrap();

        match decoded {
            AgentEvent::Heartbeat { timestamp } => assert_eq!(timestamp, 12345),
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn test_set_reminders_wire_format() {
        // Exactly what the app sends
        let raw = r#"{"type":"SET_REMINDERS","reminders":[{"id":"r1","time":"09:00","days":[1,3,5],"label":"meds"},{"id":"r2","time":"21:30"}]}"#;

        let msg: AppMessage = serde_json::from_str(raw).unwrap();
        match msg {
            AppMessage::SetReminders { reminders } => {
                assert_eq!(reminders.len(), 2);
                assert_eq!(reminders[0].id, "r1");
                assert_eq!(reminders[0].days, vec![1, 3, 5]);
                assert!(reminders[1].days.is_empty());
                assert!(reminders[1].label.is_none());
            }
            _ => panic!("Wrong message type"),
        }
    }

    #[test]
    fn test_check_reminders_wire_format() {
        let msg: AppMessage = serde_json::from_str(r#"{"type":"CHECK_REMINDERS"}"#).unwrap();
        assert!(matches!(msg, AppMessage::CheckReminders));
    }

    #[test]
    fn test_unknown_message_type_rejected() {
        assert!(serde_json::from_str::<AppMessage>(r#"{"type":"SET_THEME"}"#).is_err());
    }

    #[test]
    fn test_notification_event_serializes_tagged() {
        let event = AgentEvent::Notification {
            title: "Symptom Tracker".to_string(),
            body: "Time to log your symptoms".to_string(),
            icon: "/icons/icon.svg".to_string(),
            tag: "reminder-r1".to_string(),
            require_interaction: false,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"Notification""#));
        assert!(json.contains(r#""tag":"reminder-r1""#));
    }

    #[test]
    fn test_oversized_message_rejected() {
        let mut framed = Vec::new();
        framed.extend_from_slice(&(MAX_MESSAGE_BYTES as u32 + 1).to_be_bytes());
        framed.extend_from_slice(b"ignored");

        let mut cursor = Cursor::new(framed);
        assert!(decode_message::<AppMessage, _>(&mut cursor).is_err());
    }
}
