//! Fullwave CLI - Full-waveform LiDAR feature extraction
//!
//! Command-line interface for the fullwave feature extractor.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use fullwave::cli::commands::{self, Overrides};
use fullwave::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_filter())).init();

    info!("Fullwave feature extractor v{}", env!("CARGO_PKG_VERSION"));

    handle_command(cli.command)
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Extract {
            input,
            output,
            config,
            noise_level,
            max_count,
            method,
            gaussian,
            csv,
        } => {
            let overrides = Overrides {
                noise_level,
                max_count,
                method: method.map(Into::into),
                gaussian,
            };
            let config = commands::resolve_config(config.as_deref(), &overrides)
                .context("Failed to load configuration")?;

            commands::extract(&input, output.as_deref(), &config, csv)
                .with_context(|| format!("Failed to extract features from {}", input.display()))?;
            Ok(())
        }
        Commands::Config { path } => commands::write_default_config(&path)
            .with_context(|| format!("Failed to write {}", path.display())),
    }
}
