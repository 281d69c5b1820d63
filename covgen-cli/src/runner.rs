//! Run orchestration
//!
//! Drives every selected pattern through generate, trace write and
//! description write. A failing pattern is recorded and the run moves on;
//! nothing is retried.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use covgen_capture::{ArtifactStamp, DescriptionLogger, TraceStats, TraceWriter};
use covgen_core::{Error, Result};
use covgen_patterns::{Pattern, RandomSource};
use tracing::{error, info, warn};

use crate::args::Cli;

/// Everything a run needs, resolved from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub output_dir: PathBuf,
    /// Patterns to generate, always in `Pattern::ALL` order
    pub patterns: Vec<Pattern>,
    pub seed: Option<u64>,
}

impl RunConfig {
    /// All six patterns into `output_dir`, unseeded
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            patterns: Pattern::ALL.to_vec(),
            seed: None,
        }
    }

    /// Resolve pattern labels and flags
    ///
    /// # Errors
    ///
    /// Returns `UnknownPattern` for a label outside the catalog.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let requested = cli
            .patterns
            .iter()
            .map(|label| label.parse::<Pattern>())
            .collect::<Result<Vec<_>>>()?;

        let patterns = if requested.is_empty() {
            Pattern::ALL.to_vec()
        } else {
            Pattern::ALL
                .into_iter()
                .filter(|p| requested.contains(p))
                .collect()
        };

        Ok(Self {
            output_dir: cli.output_dir.clone(),
            patterns,
            seed: cli.seed,
        })
    }
}

/// What happened to one pattern
#[derive(Debug)]
pub enum PatternOutcome {
    /// Trace and description both written
    Complete {
        trace: PathBuf,
        description: PathBuf,
        stats: TraceStats,
    },
    /// Trace written, description failed; the trace is kept
    TraceOnly { trace: PathBuf, error: Error },
    /// Generation or trace write failed; nothing was kept
    Failed { error: Error },
}

impl PatternOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, PatternOutcome::Complete { .. })
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            PatternOutcome::Complete { .. } => None,
            PatternOutcome::TraceOnly { error, .. } | PatternOutcome::Failed { error } => {
                Some(error)
            }
        }
    }
}

/// Outcome of one pattern in a run
#[derive(Debug)]
pub struct PatternReport {
    pub pattern: Pattern,
    pub outcome: PatternOutcome,
}

impl fmt::Display for PatternReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            PatternOutcome::Complete {
                trace,
                description,
                stats,
            } => write!(
                f,
                "[ok]      {}: {} -> {}, {}",
                self.pattern,
                stats,
                trace.display(),
                description.display()
            ),
            PatternOutcome::TraceOnly { trace, error } => write!(
                f,
                "[partial] {}: {} written, description failed: {}",
                self.pattern,
                trace.display(),
                error
            ),
            PatternOutcome::Failed { error } => {
                write!(f, "[failed]  {}: {}", self.pattern, error)
            }
        }
    }
}

/// Per-pattern outcomes of a whole run, in run order
#[derive(Debug, Default)]
pub struct RunReport {
    pub patterns: Vec<PatternReport>,
}

impl RunReport {
    /// Every pattern that did not complete
    pub fn failures(&self) -> Vec<&PatternReport> {
        self.patterns
            .iter()
            .filter(|r| !r.outcome.is_complete())
            .collect()
    }

    pub fn completed(&self) -> usize {
        self.patterns.len() - self.failures().len()
    }

    pub fn is_success(&self) -> bool {
        self.failures().is_empty()
    }
}

/// Make sure the output directory exists
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::persistence("output directory", dir, e))
}

/// Generate and persist every configured pattern
pub fn run(config: &RunConfig, rng: &mut dyn RandomSource) -> RunReport {
    let traces = TraceWriter::new(&config.output_dir);
    let descriptions = DescriptionLogger::new(&config.output_dir);

    info!(
        output_dir = %config.output_dir.display(),
        patterns = config.patterns.len(),
        seeded = config.seed.is_some(),
        "Starting run"
    );

    let patterns = config
        .patterns
        .iter()
        .map(|&pattern| PatternReport {
            pattern,
            outcome: run_pattern(pattern, &traces, &descriptions, &ArtifactStamp::now(), rng),
        })
        .collect();

    let report = RunReport { patterns };
    info!(
        completed = report.completed(),
        failed = report.failures().len(),
        "Run finished"
    );
    report
}

pub(crate) fn run_pattern(
    pattern: Pattern,
    traces: &TraceWriter,
    descriptions: &DescriptionLogger,
    stamp: &ArtifactStamp,
    rng: &mut dyn RandomSource,
) -> PatternOutcome {
    let label = pattern.label();

    let packets = match pattern.generate(rng) {
        Ok(packets) => packets,
        Err(e) => {
            error!(label = %label, error = %e, "Generation failed");
            return PatternOutcome::Failed { error: e };
        }
    };

    let (trace, stats) = match traces.write(label, &packets, stamp) {
        Ok(written) => written,
        Err(e) => {
            error!(label = %label, error = %e, "Trace write failed");
            return PatternOutcome::Failed { error: e };
        }
    };

    match descriptions.write(label, pattern.description(), stamp) {
        Ok(description) => PatternOutcome::Complete {
            trace,
            description,
            stats,
        },
        Err(e) => {
            warn!(
                label = %label,
                trace = %trace.display(),
                error = %e,
                "Description write failed, keeping trace"
            );
            PatternOutcome::TraceOnly { trace, error: e }
        }
    }
}
