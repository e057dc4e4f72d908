//! # Stillmind Core Library
//!
//! This library provides the core logic for the Stillmind meditation and
//! focus timer. It implements a CLI-first philosophy where all operations
//! are available via a standalone CLI binary, with any GUI being a thin
//! layer over the same core library.
//!
//! ## Architecture
//!
//! - **Session Runner**: A wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()` for progress updates
//! - **Analytics**: Pure transforms deriving history statistics and focus
//!   advice from the session log
//! - **Storage**: SQLite-based session log and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SessionRunner`]: Countdown state machine producing session records
//! - [`HistoryAnalyzer`]: Aggregate statistics over the session log
//! - [`FocusAdvisor`]: Adaptive focus/break recommendations
//! - [`SessionStore`]: Session log and runner-state persistence
//! - [`Config`]: Application configuration management

pub mod session;
pub mod timer;
pub mod stats;
pub mod advisor;
pub mod storage;
pub mod logging;
pub mod error;

pub use advisor::{FocusAdvice, FocusAdvisor};
pub use error::{ConfigError, CoreError, Result, StorageError};
pub use session::{AudioSettings, EndType, SessionRecord};
pub use stats::{HistoryAnalyzer, HistoryStats};
pub use storage::{Config, SessionStore};
pub use timer::{RunnerSnapshot, RunnerState, SessionRunner};
