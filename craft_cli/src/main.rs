mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let sim = commands::load_simulator(&cli.content)?;

    match cli.command {
        Commands::Simulate {
            item,
            currencies,
            omens,
            seed,
            repeat,
            output,
        } => {
            commands::simulate(&sim, &item, &currencies, omens, seed, repeat, &output)?;
        }

        Commands::Reveal { item, seed, output } => {
            commands::reveal(&sim, &item, seed, &output)?;
        }

        Commands::List { what } => {
            commands::list(&sim, what)?;
        }

        Commands::OmensFor { currency } => {
            commands::omens_for(&sim, &currency)?;
        }
    }

    Ok(())
}
