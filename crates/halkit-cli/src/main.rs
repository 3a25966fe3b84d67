//! hal: inspect and reshape HAL (application/hal+json) documents.
//!
//! Commands: fmt, links, get, merge, curie, embedded

use anyhow::{Context, Result};
use clap::Parser;
use halkit_core::HalConfig;
use tracing::Level;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level(cli.verbose, cli.quiet))
        .init();

    let config = resolve_config(&cli)?;
    tracing::debug!(naming = %config.naming, pretty = config.pretty, "resolved config");

    let output = match &cli.command {
        Commands::Fmt { input } => commands::fmt(input, &config)?,
        Commands::Links { input, format } => commands::links(input, *format, &config)?,
        Commands::Get { input, property } => commands::get(input, property, &config)?,
        Commands::Merge { input, patch } => commands::merge(input, patch, &config)?,
        Commands::Curie { input, rel } => commands::curie(input, rel, &config)?,
        Commands::Embedded { input, rel } => commands::embedded(input, rel, &config)?,
    };
    println!("{output}");
    Ok(())
}

fn log_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Config file first, then command-line overrides.
fn resolve_config(cli: &Cli) -> Result<HalConfig> {
    let mut config = match &cli.config {
        Some(path) => HalConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => HalConfig::default(),
    };
    if let Some(naming) = cli.naming {
        config.naming = naming;
    }
    if cli.pretty {
        config.pretty = true;
    }
    Ok(config)
}
