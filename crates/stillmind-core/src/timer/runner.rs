//! Session runner implementation.
//!
//! The runner is a wall-clock-based state machine. It does not use internal
//! threads - the caller is responsible for calling `tick()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused <-> Running) -> Finished | Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut runner = SessionRunner::new();
//! runner.start(10, AudioSettings::default());
//! // In a loop:
//! runner.tick(); // Returns Some(SessionRecord) when the countdown ends
//! ```

use serde::{Deserialize, Serialize};

use crate::session::{AudioSettings, SessionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunnerState {
    Idle,
    Running,
    Paused,
    /// Countdown reached zero and the completed record was emitted.
    Finished,
}

/// Serializable view of the runner for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerSnapshot {
    pub state: RunnerState,
    /// Planned duration in minutes, 0 when no session is armed.
    pub planned_minutes: u32,
    /// Remaining time in milliseconds as of the last flush.
    pub remaining_ms: u64,
    /// Active (non-paused) seconds spent so far.
    pub elapsed_seconds: u32,
    /// 0.0 .. 1.0 progress through the countdown.
    pub progress: f64,
    pub audio_settings: AudioSettings,
}

/// Core session runner.
///
/// Operates on wall-clock deltas -- no internal thread. The caller is
/// responsible for calling `tick()` periodically. Serializes with serde so a
/// CLI invocation can park it between commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRunner {
    state: RunnerState,
    /// Planned duration in minutes for the armed session.
    planned_min: u32,
    /// Remaining time in milliseconds for the countdown.
    remaining_ms: u64,
    /// Audio choice snapshotted at start.
    audio: AudioSettings,
    /// Timestamp (ms since epoch) when the runner was last resumed/started.
    /// Used to compute elapsed time between ticks.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
}

impl Default for SessionRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRunner {
    /// Create a new runner in the `Idle` state.
    pub fn new() -> Self {
        Self {
            state: RunnerState::Idle,
            planned_min: 0,
            remaining_ms: 0,
            audio: AudioSettings::default(),
            last_tick_epoch_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn planned_minutes(&self) -> u32 {
        self.planned_min
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn audio_settings(&self) -> AudioSettings {
        self.audio
    }

    fn total_ms(&self) -> u64 {
        self.planned_min as u64 * 60_000
    }

    /// Active seconds spent so far, as of the last flush.
    pub fn elapsed_secs(&self) -> u32 {
        ((self.total_ms().saturating_sub(self.remaining_ms)) / 1000) as u32
    }

    /// 0.0 .. 1.0 progress through the countdown.
    pub fn progress(&self) -> f64 {
        let total = self.total_ms();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_ms as f64 / total as f64)
    }

    /// Build a full state snapshot.
    pub fn snapshot(&self) -> RunnerSnapshot {
        RunnerSnapshot {
            state: self.state,
            planned_minutes: self.planned_min,
            remaining_ms: self.remaining_ms,
            elapsed_seconds: self.elapsed_secs(),
            progress: self.progress(),
            audio_settings: self.audio,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Arm and start a countdown.
    ///
    /// A no-op returning `None` while a session is running or paused.
    pub fn start(&mut self, duration_min: u32, audio: AudioSettings) -> Option<RunnerSnapshot> {
        match self.state {
            RunnerState::Idle | RunnerState::Finished => {
                self.state = RunnerState::Running;
                self.planned_min = duration_min;
                self.remaining_ms = self.total_ms();
                self.audio = audio;
                self.last_tick_epoch_ms = Some(now_ms());
                tracing::debug!(duration_min, "session started");
                Some(self.snapshot())
            }
            RunnerState::Running | RunnerState::Paused => None,
        }
    }

    pub fn pause(&mut self) -> Option<RunnerSnapshot> {
        match self.state {
            RunnerState::Running => {
                // Flush elapsed time first.
                self.flush_elapsed();
                self.state = RunnerState::Paused;
                self.last_tick_epoch_ms = None;
                Some(self.snapshot())
            }
            _ => None,
        }
    }

    pub fn resume(&mut self) -> Option<RunnerSnapshot> {
        match self.state {
            RunnerState::Paused => {
                self.state = RunnerState::Running;
                self.last_tick_epoch_ms = Some(now_ms());
                Some(self.snapshot())
            }
            _ => None,
        }
    }

    /// Call periodically. Returns the completed record when the countdown ends.
    pub fn tick(&mut self) -> Option<SessionRecord> {
        if self.state != RunnerState::Running {
            return None;
        }
        self.flush_elapsed();
        if self.remaining_ms > 0 {
            return None;
        }
        self.state = RunnerState::Finished;
        self.last_tick_epoch_ms = None;
        tracing::info!(duration_min = self.planned_min, "session completed");
        Some(SessionRecord::completed(
            now_ms() as i64,
            self.planned_min,
            self.audio,
        ))
    }

    /// Abandon the session partway, keeping it in history.
    pub fn give_up(&mut self) -> Option<SessionRecord> {
        self.abandon(false)
    }

    /// Dismiss the session, keeping it in history as cancelled.
    pub fn cancel(&mut self) -> Option<SessionRecord> {
        self.abandon(true)
    }

    fn abandon(&mut self, cancelled: bool) -> Option<SessionRecord> {
        match self.state {
            RunnerState::Running | RunnerState::Paused => {
                if self.state == RunnerState::Running {
                    self.flush_elapsed();
                }
                let ended_at = now_ms() as i64;
                let record = if cancelled {
                    SessionRecord::cancelled(ended_at, self.planned_min, self.elapsed_secs(), self.audio)
                } else {
                    SessionRecord::gave_up(ended_at, self.planned_min, self.elapsed_secs(), self.audio)
                };
                tracing::debug!(cancelled, elapsed_secs = self.elapsed_secs(), "session abandoned");
                self.clear();
                Some(record)
            }
            _ => None,
        }
    }

    /// Discard any session without producing a record.
    pub fn reset(&mut self) {
        self.clear();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn clear(&mut self) {
        self.state = RunnerState::Idle;
        self.planned_min = 0;
        self.remaining_ms = 0;
        self.audio = AudioSettings::default();
        self.last_tick_epoch_ms = None;
    }

    fn flush_elapsed(&mut self) {
        if let Some(last) = self.last_tick_epoch_ms {
            let now = now_ms();
            let elapsed = now.saturating_sub(last);
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
            self.last_tick_epoch_ms = Some(now);
        }
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
