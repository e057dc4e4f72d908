use chrono::Local;
use clap::Subcommand;
use stillmind_core::stats::report;
use stillmind_core::storage::SessionStore;
use stillmind_core::{Config, FocusAdvisor, HistoryAnalyzer, Result};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Aggregate history statistics
    Summary {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Focus/break recommendation from recent history
    Advice {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Per-day completed minutes as a bar chart
    Chart {
        /// Number of trailing days to chart
        #[arg(long, default_value = "7")]
        days: u32,
    },
}

pub fn run(action: StatsAction) -> Result<()> {
    let store = SessionStore::open()?;
    let sessions = store.load_sessions()?;

    match action {
        StatsAction::Summary { json } => {
            let stats = HistoryAnalyzer::new().compute(&sessions);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", report::render_summary(&stats));
            }
        }
        StatsAction::Advice { json } => {
            let config = Config::load_or_default();
            let advice = FocusAdvisor::with_window(config.advisor.window_size).advise(&sessions);
            if json {
                println!("{}", serde_json::to_string_pretty(&advice)?);
            } else {
                print!("{}", report::render_advice(&advice));
            }
        }
        StatsAction::Chart { days } => {
            print!("{}", report::render_daily_chart(&sessions, days, Local::now()));
        }
    }
    Ok(())
}
