//! Single-pass reminder evaluation.
//!
//! One pass: load the list, walk it in order, fire whatever is due and not
//! yet fired today, then prune fired markers older than yesterday. Yesterday
//! is retained so a pass shortly after midnight that mis-derives "today"
//! cannot double-fire.
//!
//! Persistence reads degrade to "no data" with a logged warning and are
//! never surfaced to a caller; there is nobody waiting on the other end of
//! an evaluation pass. The dedup check and the marker write are not guarded
//! by any lock, so concurrent passes over the same store could double-fire;
//! one evaluator driven by one scheduler per process is the operating
//! assumption.

use chrono::{Duration, NaiveDateTime};
use log::{debug, error, info, warn};
use std::sync::Arc;

use crate::features::notifications::{NotificationRequest, Notifier};
use crate::features::reminders::schedule::date_key;
use crate::storage::ReminderStore;

/// Evaluates the reminder list against the wall clock.
pub struct ReminderEvaluator {
    store: ReminderStore,
    notifier: Arc<dyn Notifier>,
}

impl ReminderEvaluator {
    pub fn new(store: ReminderStore, notifier: Arc<dyn Notifier>) -> Self {
        ReminderEvaluator { store, notifier }
    }

    /// Run one evaluation pass at `now`. Returns the number of notifications
    /// emitted; the count only feeds log lines.
    pub async fn evaluate(&self, now: NaiveDateTime) -> usize {
        let reminders = match self.store.load_reminders().await {
            Ok(list) => list,
            Err(e) => {
                warn!("Failed to read reminder list, treating as empty: {e:#}");
                Vec::new()
            }
        };
        if reminders.is_empty() {
            return 0;
        }

        let today = now.date();
        let mut fired = 0;

        for reminder in &reminders {
            if reminder.scheduled_minutes().is_none() {
                warn!(
                    "Skipping reminder {} with malformed time {:?}",
                    reminder.id, reminder.time
                );
                continue;
            }

            if !reminder.matches_at(now) {
                continue;
            }

            let already_fired = match self.store.has_fired(&reminder.id, today).await {
                Ok(hit) => hit,
                Err(e) => {
                    warn!(
                        "Failed to read fired marker for {}, treating as not fired: {e:#}",
                        reminder.id
                    );
                    false
                }
            };
            if already_fired {
                debug!("Reminder {} already fired today", reminder.id);
                continue;
            }

            let request = NotificationRequest::for_reminder(reminder);
            if let Err(e) = self.notifier.notify(request).await {
                // Leave the marker unwritten so a later tick inside the
                // window can retry
                warn!(
                    "Failed to deliver notification for reminder {}: {e:#}",
                    reminder.id
                );
                continue;
            }

            info!("Fired reminder {} for {}", reminder.id, date_key(today));
            fired += 1;

            if let Err(e) = self.store.mark_fired(&reminder.id, today).await {
                error!(
                    "Failed to record fired marker for {}: {e:#}",
                    reminder.id
                );
            }
        }

        // Retention: keep today and yesterday, drop everything older
        let before = today - Duration::days(1);
        match self.store.prune_fired(before).await {
            Ok(0) => {}
            Ok(removed) => debug!("Pruned {removed} stale fired markers"),
            Err(e) => warn!("Fired-log prune failed: {e:#}"),
        }

        fired
    }
}
