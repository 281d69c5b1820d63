use anyhow::{bail, Context, Result};
use covgen_cli::runner::{self, RunConfig};
use covgen_cli::{Cli, Commands};
use covgen_patterns::Pattern;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_target(false)
        .init();

    match cli.command() {
        Commands::List => {
            for pattern in Pattern::ALL {
                println!(
                    "{:<16} {:>2} packets  {}",
                    pattern.label(),
                    pattern.packet_count(),
                    pattern.description()
                );
            }
            Ok(())
        }
        Commands::Generate => generate(&cli),
    }
}

fn generate(cli: &Cli) -> Result<()> {
    let config = RunConfig::from_cli(cli)?;
    runner::prepare_output_dir(&config.output_dir).with_context(|| {
        format!(
            "Cannot use {} as output directory",
            config.output_dir.display()
        )
    })?;

    let report = match config.seed {
        Some(seed) => runner::run(&config, &mut StdRng::seed_from_u64(seed)),
        None => runner::run(&config, &mut rand::thread_rng()),
    };

    for entry in &report.patterns {
        println!("{}", entry);
    }

    let failures = report.failures();
    if !failures.is_empty() {
        bail!(
            "{} of {} patterns did not complete",
            failures.len(),
            report.patterns.len()
        );
    }
    Ok(())
}
