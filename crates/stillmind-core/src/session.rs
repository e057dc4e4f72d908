//! Session record model.
//!
//! A `SessionRecord` is one logged meditation/focus attempt. Records are
//! immutable once created and their serialized JSON shape (camelCase keys,
//! optional fields omitted) is a compatibility contract with previously
//! persisted history, so field names here must not change.

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndType {
    /// The countdown ran to zero.
    Completed,
    /// The user gave up partway through.
    GaveUp,
    /// The user dismissed the session before committing to it.
    Cancelled,
}

/// Snapshot of the ambient audio choice for a session.
///
/// Descriptive only -- analytics never read these flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSettings {
    #[serde(default)]
    pub nature: bool,
    #[serde(default)]
    pub music: bool,
}

/// One logged session, completed or abandoned. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Unique identifier, derived from the end timestamp. Never reused.
    pub id: String,
    /// Epoch milliseconds marking session end.
    pub timestamp: i64,
    /// Planned duration in minutes, as selected by the user.
    pub duration: u32,
    /// True iff the timer ran to zero.
    pub completed: bool,
    /// Finer-grained outcome than `completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_type: Option<EndType>,
    /// Wall-clock seconds actually elapsed before the end.
    /// Present mainly for non-completed sessions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_duration_seconds: Option<u32>,
    #[serde(default)]
    pub audio_settings: AudioSettings,
}

impl SessionRecord {
    /// Build a completed record ending at `ended_at_ms`.
    pub fn completed(ended_at_ms: i64, duration_min: u32, audio: AudioSettings) -> Self {
        Self {
            id: ended_at_ms.to_string(),
            timestamp: ended_at_ms,
            duration: duration_min,
            completed: true,
            end_type: Some(EndType::Completed),
            actual_duration_seconds: Some(duration_min.saturating_mul(60)),
            audio_settings: audio,
        }
    }

    /// Build a gave-up record; `elapsed_secs` is clamped to at least 1.
    pub fn gave_up(
        ended_at_ms: i64,
        duration_min: u32,
        elapsed_secs: u32,
        audio: AudioSettings,
    ) -> Self {
        Self::abandoned(ended_at_ms, duration_min, elapsed_secs, EndType::GaveUp, audio)
    }

    /// Build a cancelled record; `elapsed_secs` is clamped to at least 1.
    pub fn cancelled(
        ended_at_ms: i64,
        duration_min: u32,
        elapsed_secs: u32,
        audio: AudioSettings,
    ) -> Self {
        Self::abandoned(ended_at_ms, duration_min, elapsed_secs, EndType::Cancelled, audio)
    }

    fn abandoned(
        ended_at_ms: i64,
        duration_min: u32,
        elapsed_secs: u32,
        end_type: EndType,
        audio: AudioSettings,
    ) -> Self {
        Self {
            id: ended_at_ms.to_string(),
            timestamp: ended_at_ms,
            duration: duration_min,
            completed: false,
            end_type: Some(end_type),
            actual_duration_seconds: Some(elapsed_secs.max(1)),
            audio_settings: audio,
        }
    }

    /// Session end as a local-timezone datetime.
    ///
    /// Out-of-range timestamps fall back to the epoch rather than failing;
    /// analytics must stay total over whatever ended up in the log.
    pub fn ended_at_local(&self) -> DateTime<Local> {
        DateTime::<Utc>::from_timestamp_millis(self.timestamp)
            .unwrap_or_default()
            .with_timezone(&Local)
    }

    /// Local calendar day the session ended on.
    pub fn local_day(&self) -> NaiveDate {
        self.ended_at_local().date_naive()
    }

    /// Local weekday index, Sunday = 0 .. Saturday = 6.
    pub fn weekday_index(&self) -> usize {
        self.ended_at_local().weekday().num_days_from_sunday() as usize
    }
}
