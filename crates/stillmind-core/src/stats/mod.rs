mod history;
pub mod report;

pub use history::{HistoryAnalyzer, HistoryStats};
