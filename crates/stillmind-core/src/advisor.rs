//! Adaptive focus recommendations.
//!
//! `FocusAdvisor` turns the most recent session records into a suggested
//! focus/break pair. Completed sessions pull the suggestion toward their
//! median length; abandoned ones define a safety band that shortens it.

use serde::{Deserialize, Serialize};

use crate::session::SessionRecord;

/// A focus/break recommendation derived from recent history.
///
/// Disposable: recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusAdvice {
    /// Suggested focus block length in minutes
    pub focus_minutes: u32,
    /// Suggested break length in minutes
    pub break_minutes: u32,
    /// Human-readable explanation of the suggestion
    pub rationale: String,
    /// Confidence in the suggestion (0.0-1.0)
    pub confidence: f64,
}

/// Advisor computing focus recommendations from recent session records.
#[derive(Debug, Clone)]
pub struct FocusAdvisor {
    /// Number of most-recent records considered
    pub window_size: usize,
}

impl Default for FocusAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusAdvisor {
    /// Create a new advisor with the default window.
    pub fn new() -> Self {
        Self { window_size: 20 }
    }

    /// Create advisor with a custom window size.
    pub fn with_window(window_size: usize) -> Self {
        Self { window_size }
    }

    /// Compute advice from history ordered most-recent-first.
    ///
    /// Total over any input: no history (or a zero-sized window) yields the
    /// fixed cold-start default.
    pub fn advise(&self, sessions: &[SessionRecord]) -> FocusAdvice {
        let window = &sessions[..sessions.len().min(self.window_size)];
        if window.is_empty() {
            return Self::default_advice();
        }

        let completed: Vec<f64> = window
            .iter()
            .filter(|s| s.completed)
            .map(|s| s.duration as f64)
            .collect();
        // Cancelled sessions count as abandoned here.
        let gave_up: Vec<f64> = window
            .iter()
            .filter(|s| !s.completed)
            .map(effective_minutes)
            .collect();

        // Median of what the user finishes; 25 when nothing finished yet.
        let median = if completed.is_empty() {
            25.0
        } else {
            percentile(&completed, 50.0)
        };
        // Where abandoned sessions tend to die; equal to the median (no
        // adjustment) when nothing was abandoned.
        let safety_band = if gave_up.is_empty() {
            median
        } else {
            percentile(&gave_up, 40.0)
        };

        // Close 35% of the gap down to the safety band, floor at 10 minutes.
        let focus_minutes = (median - (median - safety_band).max(0.0) * 0.35)
            .round()
            .max(10.0) as u32;
        // One fifth of the focus block, floor at 3 minutes.
        let break_minutes = (focus_minutes as f64 * 0.2).round().max(3.0) as u32;

        let completion_rate = completed.len() as f64 / window.len() as f64;
        let sample_weight = (completed.len() as f64 / 10.0).min(1.0);
        let confidence = (0.3 + 0.7 * sample_weight * completion_rate).min(1.0);

        let rationale = if completion_rate < 0.5 {
            "Completion rate is low; shortened focus blocks should help you finish what you start."
        } else {
            "Based on the median length of your recent completed sessions."
        }
        .to_string();

        FocusAdvice {
            focus_minutes,
            break_minutes,
            rationale,
            confidence,
        }
    }

    /// The cold-start recommendation used before any history exists.
    fn default_advice() -> FocusAdvice {
        FocusAdvice {
            focus_minutes: 25,
            break_minutes: 5,
            rationale: "Default Pomodoro-friendly cadence.".to_string(),
            confidence: 0.25,
        }
    }
}

/// Effective minutes for a non-completed session.
///
/// Elapsed wall-clock time rounded to minutes when recorded, with a
/// one-minute floor; otherwise the planned duration.
fn effective_minutes(session: &SessionRecord) -> f64 {
    match session.actual_duration_seconds {
        Some(secs) => (secs as f64 / 60.0).round().max(1.0),
        None => session.duration as f64,
    }
}

/// Percentile by linear interpolation between order statistics.
///
/// `p` is in percent and clamps to [0, 100]. Empty input yields 0; a single
/// element is returned unchanged for any `p`. Sorts a copy of the input.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}
