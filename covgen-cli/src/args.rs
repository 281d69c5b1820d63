//! CLI argument parsing
//!
//! Command-line interface for covgen: where to write fixtures, which
//! patterns to generate and how to seed the noise fields.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "covgen")]
#[command(version, about = "Covert-channel pcap fixture generator", long_about = None)]
pub struct Cli {
    /// Directory that receives traces and descriptions (created if missing).
    /// Existing artifacts are never overwritten, so a second run into the
    /// same directory within the same second fails for the colliding patterns
    #[arg(short = 'o', long, value_name = "DIR", default_value = ".", global = true)]
    pub output_dir: PathBuf,

    /// Only generate the named pattern (repeatable)
    #[arg(short = 'p', long = "pattern", value_name = "LABEL", global = true)]
    pub patterns: Vec<String>,

    /// Seed for the noise fields, making the run reproducible
    #[arg(short = 's', long, value_name = "SEED", global = true)]
    pub seed: Option<u64>,

    /// Verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Generate traces and descriptions (default)
    Generate,

    /// List the available patterns
    List,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Subcommand to run, `generate` when none was given
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Generate)
    }

    /// Tracing filter directive for the `-v` count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
