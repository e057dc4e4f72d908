//! Session history statistics.
//!
//! `HistoryAnalyzer` derives aggregate statistics from the session log:
//! day streaks, completion rate, rolling-window minute totals and
//! per-weekday productivity. The computation is a pure transform over the
//! record list; nothing here touches storage or the wall clock unless the
//! caller asks for the convenience entry point.

use std::collections::BTreeSet;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::session::SessionRecord;

/// Full weekday names, Sunday = 0 .. Saturday = 6.
const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Aggregate statistics over the session log.
///
/// A derived view, recomputed per call and never persisted. The serialized
/// camelCase shape matches what presentation layers already consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    /// Number of completed sessions
    pub total_sessions: u64,
    /// Planned minutes summed over completed sessions
    pub total_minutes: u64,
    /// Consecutive days with a completed session, ending today or yesterday
    pub current_streak: u32,
    /// Count of completed sessions
    pub completed_sessions: u64,
    /// Count of sessions that did not complete
    pub gave_up_sessions: u64,
    /// Completed count over the full record count (0.0-1.0)
    pub completion_rate: f64,
    /// Completed minutes within the trailing weekly window
    pub weekly_minutes: u64,
    /// Completed minutes within the trailing monthly window
    pub monthly_minutes: u64,
    /// Mean planned minutes per completed session, rounded
    pub average_duration: u32,
    /// Longest run of consecutive days with a completed session
    pub best_streak: u32,
    /// Weekday with the highest completed-minute total, empty when none
    pub most_productive_day: String,
    /// Longest planned duration among completed sessions
    pub longest_session_minutes: u32,
}

/// Analyzer for computing aggregate statistics from session records.
#[derive(Debug, Clone)]
pub struct HistoryAnalyzer {
    /// Rolling window in days for the weekly total
    pub weekly_window_days: i64,
    /// Rolling window in days for the monthly total
    pub monthly_window_days: i64,
}

impl Default for HistoryAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryAnalyzer {
    /// Create a new analyzer with default settings.
    pub fn new() -> Self {
        Self {
            weekly_window_days: 7,
            monthly_window_days: 30,
        }
    }

    /// Create analyzer with custom rolling windows.
    pub fn with_windows(weekly_days: i64, monthly_days: i64) -> Self {
        Self {
            weekly_window_days: weekly_days,
            monthly_window_days: monthly_days,
        }
    }

    /// Compute statistics anchored at the current local time.
    pub fn compute(&self, sessions: &[SessionRecord]) -> HistoryStats {
        self.compute_at(sessions, Local::now())
    }

    /// Compute statistics anchored at an explicit instant.
    ///
    /// Input ordering does not matter. Two calls over the same list with the
    /// same anchor produce identical output.
    pub fn compute_at(&self, sessions: &[SessionRecord], now: DateTime<Local>) -> HistoryStats {
        let completed: Vec<&SessionRecord> = sessions.iter().filter(|s| s.completed).collect();
        let completed_count = completed.len() as u64;
        let total_minutes: u64 = completed.iter().map(|s| s.duration as u64).sum();

        let completion_rate = if sessions.is_empty() {
            0.0
        } else {
            completed_count as f64 / sessions.len() as f64
        };

        let average_duration = if completed.is_empty() {
            0
        } else {
            (total_minutes as f64 / completed.len() as f64).round() as u32
        };

        let longest_session_minutes = completed.iter().map(|s| s.duration).max().unwrap_or(0);

        let now_ms = now.timestamp_millis();
        let weekly_minutes = self.window_minutes(&completed, now_ms, self.weekly_window_days);
        let monthly_minutes = self.window_minutes(&completed, now_ms, self.monthly_window_days);

        // One entry per local calendar day, however many sessions landed on it.
        let completed_days: BTreeSet<NaiveDate> =
            completed.iter().map(|s| s.local_day()).collect();
        let current_streak = self.current_streak(&completed_days, now.date_naive());
        let best_streak = self.best_streak(&completed_days);

        let most_productive_day = self.most_productive_day(&completed);

        HistoryStats {
            total_sessions: completed_count,
            total_minutes,
            current_streak,
            completed_sessions: completed_count,
            gave_up_sessions: sessions.len() as u64 - completed_count,
            completion_rate,
            weekly_minutes,
            monthly_minutes,
            average_duration,
            best_streak,
            most_productive_day,
            longest_session_minutes,
        }
    }

    /// Sum completed minutes whose end falls inside the trailing window.
    ///
    /// Saturating arithmetic keeps this total over extreme timestamps.
    fn window_minutes(&self, completed: &[&SessionRecord], now_ms: i64, window_days: i64) -> u64 {
        let window_ms = window_days.saturating_mul(DAY_MS);
        completed
            .iter()
            .filter(|s| now_ms.saturating_sub(s.timestamp) <= window_ms)
            .map(|s| s.duration as u64)
            .sum()
    }

    /// Backward walk over the day set, starting at today or yesterday.
    fn current_streak(&self, days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
        let start = if days.contains(&today) {
            today
        } else {
            match today.pred_opt() {
                Some(yesterday) if days.contains(&yesterday) => yesterday,
                _ => return 0,
            }
        };

        let mut streak = 0u32;
        let mut cursor = start;
        while days.contains(&cursor) {
            streak += 1;
            match cursor.pred_opt() {
                Some(prev) => cursor = prev,
                None => break,
            }
        }
        streak
    }

    /// Longest run of consecutive days anywhere in the day set.
    fn best_streak(&self, days: &BTreeSet<NaiveDate>) -> u32 {
        let mut best = 0u32;
        let mut run = 0u32;
        let mut prev: Option<NaiveDate> = None;
        for &day in days {
            run = match prev.and_then(|p| p.succ_opt()) {
                Some(next) if next == day => run + 1,
                _ => 1,
            };
            best = best.max(run);
            prev = Some(day);
        }
        best
    }

    /// Weekday with the highest completed-minute total.
    ///
    /// Ties break toward the earliest weekday index, Sunday first.
    fn most_productive_day(&self, completed: &[&SessionRecord]) -> String {
        if completed.is_empty() {
            return String::new();
        }

        let mut minutes_by_weekday = [0u64; 7];
        for session in completed {
            minutes_by_weekday[session.weekday_index()] += session.duration as u64;
        }

        let mut best_idx = 0;
        for (idx, &minutes) in minutes_by_weekday.iter().enumerate() {
            if minutes > minutes_by_weekday[best_idx] {
                best_idx = idx;
            }
        }
        DAY_NAMES[best_idx].to_string()
    }
}
