//! Periodic evaluation loop.
//!
//! Stands in for the host platform's background trigger: a fixed-cadence
//! tick that hands the current local wall clock to the evaluator. Cadence is
//! best effort. A tick that arrives late runs late, and ticks missed while
//! the process is down are not replayed; the fired log keeps a late or
//! doubled tick from re-firing anything.

use chrono::Local;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

use crate::features::reminders::ReminderEvaluator;

/// Drives the evaluator on a fixed interval.
pub struct ReminderScheduler {
    evaluator: Arc<ReminderEvaluator>,
    period: Duration,
}

impl ReminderScheduler {
    pub fn new(evaluator: Arc<ReminderEvaluator>, period: Duration) -> Self {
        ReminderScheduler { evaluator, period }
    }

    /// Run the check loop until the surrounding task is dropped.
    pub async fn run(self) {
        info!(
            "Reminder scheduler running every {}s",
            self.period.as_secs()
        );

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let now = Local::now().naive_local();
            let fired = self.evaluator.evaluate(now).await;
            if fired > 0 {
                info!("Evaluation pass fired {fired} notification(s)");
            } else {
                debug!("Evaluation pass fired nothing");
            }
        }
    }
}
