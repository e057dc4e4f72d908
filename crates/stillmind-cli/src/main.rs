use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "stillmind-cli", version, about = "Stillmind CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Session control
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// History statistics and advice
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Session history management
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();

    // Keep the guard alive for the whole invocation so pending writes flush.
    let config = stillmind_core::Config::load_or_default();
    let _logging = stillmind_core::logging::init(&config.logging).ok();

    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::History { action } => commands::history::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
