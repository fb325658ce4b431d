//! drift-bagging - Main Entry Point

use clap::Parser;
use drift_bagging::cli::{cmd_evaluate, cmd_simulate, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drift_bagging=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            generator,
            instances,
            drift_every,
            noise,
            stream_seed,
            ensemble,
        } => {
            cmd_simulate(generator, instances, drift_every, noise, stream_seed, &ensemble)?;
        }
        Commands::Evaluate { data, target, ensemble } => {
            cmd_evaluate(&data, &target, &ensemble)?;
        }
    }

    Ok(())
}
