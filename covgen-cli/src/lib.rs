//! CLI interface for covgen
//!
//! This crate provides the command-line interface for covgen, including
//! argument parsing and the run orchestrator behind the `covgen` binary.

pub mod args;
pub mod runner;

pub use args::{Cli, Commands};
pub use runner::{run, PatternOutcome, PatternReport, RunConfig, RunReport};
