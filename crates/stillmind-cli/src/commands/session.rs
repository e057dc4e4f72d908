use clap::Subcommand;
use stillmind_core::storage::SessionStore;
use stillmind_core::timer::SessionRunner;
use stillmind_core::{AudioSettings, Config, Result};

const RUNNER_KEY: &str = "session_runner";

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a new session
    Start {
        /// Session length in minutes (defaults to the configured length)
        #[arg(long)]
        minutes: Option<u32>,
        /// Enable nature ambience for this session
        #[arg(long)]
        nature: bool,
        /// Enable music ambience for this session
        #[arg(long)]
        music: bool,
    },
    /// Print current session state as JSON (ticks the countdown first)
    Status,
    /// Pause the running session
    Pause,
    /// Resume a paused session
    Resume,
    /// Abandon the session, logging it as given up
    GiveUp,
    /// Dismiss the session, logging it as cancelled
    Cancel,
    /// Discard any session without logging a record
    Reset,
}

fn load_runner(store: &SessionStore) -> SessionRunner {
    if let Ok(Some(json)) = store.kv_get(RUNNER_KEY) {
        if let Ok(runner) = serde_json::from_str::<SessionRunner>(&json) {
            return runner;
        }
    }
    SessionRunner::new()
}

fn save_runner(store: &SessionStore, runner: &SessionRunner) -> Result<()> {
    let json = serde_json::to_string(runner)?;
    store.kv_set(RUNNER_KEY, &json)?;
    Ok(())
}

pub fn run(action: SessionAction) -> Result<()> {
    let store = SessionStore::open()?;
    let mut runner = load_runner(&store);

    match action {
        SessionAction::Start {
            minutes,
            nature,
            music,
        } => {
            let config = Config::load_or_default();
            let duration = minutes.unwrap_or(config.session.default_duration_min);
            let audio = AudioSettings {
                nature: nature || config.audio.nature,
                music: music || config.audio.music,
            };
            match runner.start(duration, audio) {
                Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                None => eprintln!("a session is already underway; give it up or reset first"),
            }
        }
        SessionAction::Status => {
            // Tick to flush elapsed time; the countdown may have completed
            // while no command was running.
            let completed = runner.tick();
            let snapshot = runner.snapshot();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            if let Some(record) = completed {
                store.append_session(&record)?;
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
        }
        SessionAction::Pause => match runner.pause() {
            Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
            None => eprintln!("no running session to pause"),
        },
        SessionAction::Resume => match runner.resume() {
            Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
            None => eprintln!("no paused session to resume"),
        },
        SessionAction::GiveUp => match runner.give_up() {
            Some(record) => {
                store.append_session(&record)?;
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
            None => eprintln!("no session to give up"),
        },
        SessionAction::Cancel => match runner.cancel() {
            Some(record) => {
                store.append_session(&record)?;
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
            None => eprintln!("no session to cancel"),
        },
        SessionAction::Reset => {
            runner.reset();
            println!("{}", serde_json::to_string_pretty(&runner.snapshot())?);
        }
    }

    save_runner(&store, &runner)?;
    Ok(())
}
