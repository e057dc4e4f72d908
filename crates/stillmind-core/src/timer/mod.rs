mod runner;

pub use runner::{RunnerSnapshot, RunnerState, SessionRunner};
