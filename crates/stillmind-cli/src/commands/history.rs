use std::path::PathBuf;

use chrono::{DateTime, Local};
use clap::Subcommand;
use stillmind_core::storage::SessionStore;
use stillmind_core::{AudioSettings, CoreError, EndType, Result, SessionRecord};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List logged sessions, most recent first
    List {
        /// Maximum number of records to print
        #[arg(long)]
        limit: Option<usize>,
        /// Print as JSON instead of one line per record
        #[arg(long)]
        json: bool,
    },
    /// Backfill a record without running a session
    Add {
        /// Planned duration in minutes
        #[arg(long)]
        minutes: u32,
        /// Log the session as given up instead of completed
        #[arg(long)]
        gave_up: bool,
        /// Log the session as cancelled instead of completed
        #[arg(long, conflicts_with = "gave_up")]
        cancelled: bool,
        /// Elapsed seconds (non-completed sessions)
        #[arg(long)]
        actual_seconds: Option<u32>,
        /// End time as RFC3339 (defaults to now)
        #[arg(long)]
        when: Option<String>,
        /// Nature ambience was on
        #[arg(long)]
        nature: bool,
        /// Music ambience was on
        #[arg(long)]
        music: bool,
    },
    /// Delete the entire history
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
    /// Write history JSON to a file, or stdout when no path is given
    Export { path: Option<PathBuf> },
    /// Merge records from a history JSON file
    Import { path: PathBuf },
}

pub fn run(action: HistoryAction) -> Result<()> {
    let store = SessionStore::open()?;

    match action {
        HistoryAction::List { limit, json } => {
            let mut sessions = store.load_sessions()?;
            if let Some(limit) = limit {
                sessions.truncate(limit);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
            } else {
                for record in &sessions {
                    println!(
                        "{}  {:>4} min  {}",
                        record.ended_at_local().format("%Y-%m-%d %H:%M"),
                        record.duration,
                        outcome_label(record)
                    );
                }
            }
        }
        HistoryAction::Add {
            minutes,
            gave_up,
            cancelled,
            actual_seconds,
            when,
            nature,
            music,
        } => {
            let ended_at = match when {
                Some(s) => DateTime::parse_from_rfc3339(&s)
                    .map_err(|e| CoreError::Custom(format!("invalid --when value: {e}")))?
                    .timestamp_millis(),
                None => Local::now().timestamp_millis(),
            };
            let audio = AudioSettings { nature, music };

            let record = if gave_up || cancelled {
                let end_type = if cancelled {
                    EndType::Cancelled
                } else {
                    EndType::GaveUp
                };
                SessionRecord {
                    id: ended_at.to_string(),
                    timestamp: ended_at,
                    duration: minutes,
                    completed: false,
                    end_type: Some(end_type),
                    actual_duration_seconds: actual_seconds.map(|s| s.max(1)),
                    audio_settings: audio,
                }
            } else {
                SessionRecord::completed(ended_at, minutes, audio)
            };

            store.append_session(&record)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        HistoryAction::Clear { yes } => {
            if !yes {
                eprintln!("refusing to clear history without --yes");
                std::process::exit(1);
            }
            let deleted = store.clear_sessions()?;
            println!("deleted {deleted} sessions");
        }
        HistoryAction::Export { path } => {
            let json = store.export_json()?;
            match path {
                Some(path) => {
                    std::fs::write(&path, &json)?;
                    println!("exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        HistoryAction::Import { path } => {
            let json = std::fs::read_to_string(&path)?;
            let inserted = store.import_json(&json)?;
            println!("imported {inserted} new sessions");
        }
    }
    Ok(())
}

fn outcome_label(record: &SessionRecord) -> &'static str {
    match record.end_type {
        Some(EndType::Completed) => "completed",
        Some(EndType::GaveUp) => "gave up",
        Some(EndType::Cancelled) => "cancelled",
        None => {
            if record.completed {
                "completed"
            } else {
                "gave up"
            }
        }
    }
}
