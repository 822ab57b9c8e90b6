use anyhow::Result;
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;
use tokio::sync::broadcast;

use tracker_agent::core::Config;
use tracker_agent::features::notifications::IpcNotifier;
use tracker_agent::features::reminders::{ReminderEvaluator, ReminderScheduler};
use tracker_agent::ipc::server::EVENT_CHANNEL_CAPACITY;
use tracker_agent::ipc::IpcServer;
use tracker_agent::storage::{ReminderStore, SqliteStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env();
    info!(
        "Starting tracker agent (db: {}, socket: {}, check interval: {}s)",
        config.db_path,
        config.socket_path,
        config.check_interval.as_secs()
    );

    let store = ReminderStore::new(Arc::new(SqliteStore::open(&config.db_path)?));

    // One event stream feeds every connected client: notification requests
    // from evaluation passes and server heartbeats
    let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
    let notifier = Arc::new(IpcNotifier::new(event_tx.clone()));
    let evaluator = Arc::new(ReminderEvaluator::new(store.clone(), notifier));

    let server = Arc::new(IpcServer::new(
        config.socket_path.clone(),
        store,
        evaluator.clone(),
        event_tx,
    ));
    server.start().await?;

    let scheduler = ReminderScheduler::new(evaluator, config.check_interval);

    tokio::select! {
        _ = scheduler.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, stopping");
        }
    }

    Ok(())
}
