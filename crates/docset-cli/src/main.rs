//! docset-index - annotate the OCaml HTML manual for Dash and build its search index
//!
//! Entry point: parse arguments, set up logging, assemble the configuration
//! and hand over to [`docset_core::run`].

use anyhow::{Context, Result};
use clap::Parser;
use docset_core::{DriverOptions, IndexerConfig};
use tracing::error;

mod cli;
mod logging;
mod output;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::initialize_logging(&cli)?;

    let config = load_config(&cli)?;
    let options = DriverOptions {
        input_root: cli.manual_dir.clone(),
        index_path: cli.index_db.clone(),
        output_root: cli.output.clone(),
        config,
    };

    let summary = docset_core::run(options)
        .inspect_err(|e| error!(category = e.category(), "{e}"))
        .with_context(|| format!("Failed to index {}", cli.manual_dir.display()))?;

    output::print_summary(&summary, cli.format(), cli.quiet)
}

/// Configuration file (if any) with command-line overrides applied.
fn load_config(cli: &Cli) -> Result<IndexerConfig> {
    let mut config = match &cli.config {
        Some(path) => IndexerConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => IndexerConfig::default(),
    };

    if !cli.exclude.is_empty() {
        config.exclude.clone_from(&cli.exclude);
    }
    if let Some(notes) = cli.unclassified_notes {
        config.unclassified_notes = notes.into();
    }
    Ok(config)
}
