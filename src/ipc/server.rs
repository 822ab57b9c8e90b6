//! # IPC Server
//!
//! Unix socket server for the agent to communicate with the tracker app.
//!
//! Inbound, the app pushes [`AppMessage`]s (reminder list replacements and
//! on-demand check requests). Outbound, every connected client receives the
//! [`AgentEvent`] broadcast stream: notification requests and heartbeats.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.4.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Heartbeat loop for connected clients
//! - 1.0.0: Initial IPC implementation with Unix socket protocol

use anyhow::{anyhow, Result};
use chrono::{Local, Utc};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::unix::OwnedReadHalf;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, RwLock};

use crate::features::reminders::ReminderEvaluator;
use crate::ipc::protocol::{encode_message, AgentEvent, AppMessage, MAX_MESSAGE_BYTES};
use crate::storage::ReminderStore;

/// Maximum number of concurrently connected app clients
const MAX_CLIENTS: usize = 4;

/// Broadcast channel capacity for agent events
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Seconds between keep-alive heartbeats
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// IPC server handle for the agent
pub struct IpcServer {
    socket_path: String,
    store: ReminderStore,
    evaluator: Arc<ReminderEvaluator>,
    /// Broadcast sender for events to all clients
    event_tx: broadcast::Sender<AgentEvent>,
    /// Connected client count
    client_count: Arc<RwLock<usize>>,
}

impl IpcServer {
    /// Create a new IPC server (does not start listening yet).
    ///
    /// `event_tx` is shared with the notifier so evaluation passes reach
    /// connected clients through the same stream as heartbeats.
    pub fn new(
        socket_path: String,
        store: ReminderStore,
        evaluator: Arc<ReminderEvaluator>,
        event_tx: broadcast::Sender<AgentEvent>,
    ) -> Self {
        IpcServer {
            socket_path,
            store,
            evaluator,
            event_tx,
            client_count: Arc::new(RwLock::new(0)),
        }
    }

    /// Handle for publishing events to connected clients.
    pub fn events(&self) -> broadcast::Sender<AgentEvent> {
        self.event_tx.clone()
    }

    /// Start the IPC server in background tasks.
    pub async fn start(self: Arc<Self>) -> Result<()> {
        // Remove existing socket file if it exists
        if std::path::Path::new(&self.socket_path).exists() {
            std::fs::remove_file(&self.socket_path)?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;
        info!("IPC server listening on {}", self.socket_path);

        // Heartbeat loop
        let heartbeat_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(std::time::Duration::from_secs(HEARTBEAT_INTERVAL_SECS));
            loop {
                ticker.tick().await;
                let _ = heartbeat_tx.send(AgentEvent::Heartbeat {
                    timestamp: Utc::now().timestamp(),
                });
            }
        });

        // Accept loop
        let server = self.clone();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, _addr)) => {
                        let client_count = *server.client_count.read().await;
                        if client_count >= MAX_CLIENTS {
                            warn!(
                                "Maximum IPC clients reached ({MAX_CLIENTS}), rejecting connection"
                            );
                            continue;
                        }

                        *server.client_count.write().await += 1;
                        info!("App client connected (total: {})", client_count + 1);

                        let server_clone = server.clone();
                        let client_count_ref = server.client_count.clone();
                        tokio::spawn(async move {
                            if let Err(e) = server_clone.handle_client(stream).await {
                                debug!("Client handler ended: {e:#}");
                            }
                            *client_count_ref.write().await -= 1;
                            info!("App client disconnected");
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept IPC connection: {e:#}");
                    }
                }
            }
        });

        Ok(())
    }

    /// Handle a connected client until it hangs up.
    async fn handle_client(self: Arc<Self>, stream: UnixStream) -> Result<()> {
        let (mut reader, mut writer) = stream.into_split();

        // Writer side: forward broadcast events to this client
        let mut events = self.event_tx.subscribe();
        let writer_task = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let encoded = match encode_message(&event) {
                            Ok(bytes) => bytes,
                            Err(e) => {
                                error!("Failed to encode agent event: {e:#}");
                                continue;
                            }
                        };
                        if writer.write_all(&encoded).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("IPC client lagging, dropped {skipped} event(s)");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        // Reader side: handle app messages until EOF or a framing error
        loop {
            match Self::read_message(&mut reader).await {
                Ok(msg) => self.handle_message(msg).await,
                Err(e) => {
                    debug!("IPC read loop ended: {e:#}");
                    break;
                }
            }
        }

        writer_task.abort();
        Ok(())
    }

    /// Read one framed [`AppMessage`] from the client.
    async fn read_message(reader: &mut OwnedReadHalf) -> Result<AppMessage> {
        let mut len_buf = [0u8; 4];
        reader.read_exact(&mut len_buf).await?;
        let len = u32::from_be_bytes(len_buf) as usize;

        if len > MAX_MESSAGE_BYTES {
            return Err(anyhow!("Message too large: {len} bytes"));
        }

        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf).await?;

        Ok(serde_json::from_slice(&buf)?)
    }

    /// Process one inbound message.
    async fn handle_message(&self, msg: AppMessage) {
        match msg {
            AppMessage::SetReminders { reminders } => {
                info!("Received reminder list with {} entries", reminders.len());
                if let Err(e) = self.store.save_reminders(&reminders).await {
                    error!("Failed to persist reminder list: {e:#}");
                }
            }
            AppMessage::CheckReminders => {
                let fired = self.evaluator.evaluate(Local::now().naive_local()).await;
                debug!("On-demand evaluation pass fired {fired} notification(s)");
            }
        }
    }
}
