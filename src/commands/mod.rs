//! Command implementations

pub mod run;

pub use run::{run, run_phase, PhaseReport, RunOutcome, RunReport};
