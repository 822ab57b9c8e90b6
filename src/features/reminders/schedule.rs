//! Reminder schedule model and time/day matching.
//!
//! A reminder is due when the current weekday is in its `days` set (empty
//! set means every day) and the wall clock is within the tolerance window
//! around its `time`. The window does not wrap across midnight: a reminder
//! at `23:58` does not match at `00:02` the next day. That asymmetry is
//! contractual, not a bug.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Minutes either side of the scheduled time that still count as "due now"
pub const TOLERANCE_MINUTES: i64 = 8;

/// A user-configured reminder. Created and edited by the app; the agent only
/// reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    /// Opaque identifier, unique among reminders
    pub id: String,
    /// Local time of day as "HH:MM"
    pub time: String,
    /// Weekday indices, 0=Sunday..6=Saturday; empty means every day
    #[serde(default)]
    pub days: Vec<u8>,
    /// Optional display text woven into the notification body
    #[serde(default)]
    pub label: Option<String>,
}

impl Reminder {
    /// The scheduled time as minutes past midnight, or `None` when the
    /// `time` field is malformed.
    pub fn scheduled_minutes(&self) -> Option<u32> {
        parse_time(&self.time).map(|(hours, minutes)| hours * 60 + minutes)
    }

    /// Whether this reminder is due at `now` (local wall clock).
    pub fn matches_at(&self, now: NaiveDateTime) -> bool {
        let Some(scheduled) = self.scheduled_minutes() else {
            return false;
        };

        let weekday = now.weekday().num_days_from_sunday() as u8;
        if !self.days.is_empty() && !self.days.contains(&weekday) {
            return false;
        }

        let now_minutes = i64::from(now.hour() * 60 + now.minute());
        (i64::from(scheduled) - now_minutes).abs() <= TOLERANCE_MINUTES
    }
}

/// Parse a strict "HH:MM" time-of-day string.
pub fn parse_time(time: &str) -> Option<(u32, u32)> {
    let (hours, minutes) = time.split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some((hours, minutes))
}

/// Canonical zero-padded "YYYY-MM-DD" form of a date.
///
/// Used both for display and as the fired-log key component; zero padding
/// makes lexicographic order equal chronological order.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
