//! Command-line interface and batch driver.
//!
//! Resolves the requested plot configurations, then loads and renders each
//! plot strictly in sequence. The first error aborts the whole batch.

use crate::{config, data, render};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Generate the set of grouped bar charts defined by METADATA_FILE. If no
/// PLOT is given, every plot defined in METADATA_FILE is generated.
#[derive(Parser)]
#[command(name = "scientometry-plot-gen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Load plot metadata from METADATA_FILE
    #[arg(short = 'm', value_name = "METADATA_FILE", default_value = "plot-metadata.yaml")]
    metadata_file: PathBuf,

    /// Plot names defined in METADATA_FILE; a trailing `.csv` is stripped,
    /// so tab-completing a data file name works too
    #[arg(value_name = "PLOT")]
    plots: Vec<String>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let requested: Vec<String> = cli
        .plots
        .iter()
        .map(|p| p.strip_suffix(".csv").unwrap_or(p).to_string())
        .collect();

    let configs = config::resolve(&cli.metadata_file, &requested)?;
    tracing::debug!(count = configs.len(), "resolved plot configurations");

    for cfg in &configs {
        println!("Generating {} ...", cfg.plot_file);
        let dataset = data::load_dataset(Path::new(&cfg.data_file))
            .with_context(|| format!("plot '{}'", cfg.name))?;
        render::render_plot(cfg, &dataset)
            .with_context(|| format!("plot '{}'", cfg.name))?;
    }

    Ok(())
}
