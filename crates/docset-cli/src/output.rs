//! Run summary output.
//!
//! - **Text**: a short human-readable report (default)
//! - **JSON**: the [`RunSummary`] object, pretty-printed

use anyhow::Result;
use colored::Colorize;
use docset_core::RunSummary;
use std::io::{self, Write};

/// Output format for the run summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print the summary to stdout.
pub fn print_summary(summary: &RunSummary, format: OutputFormat, quiet: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, summary)?;
            writeln!(out)?;
        },
        OutputFormat::Text if quiet => {},
        OutputFormat::Text => out.write_all(render_text(summary).as_bytes())?,
    }
    Ok(())
}

fn render_text(summary: &RunSummary) -> String {
    let mut text = format!(
        "{} {} entries from {} pages ({} rewritten)\n",
        "✓ Indexed".green(),
        summary.entries_inserted.to_string().green(),
        summary.pages,
        summary.rewritten,
    );
    text.push_str(&format!(
        "  modules: {}  interfaces: {}  libraries: {}\n",
        summary.modules, summary.interfaces, summary.libraries
    ));
    text.push_str(&format!(
        "  suppressed: {}  unclassified: {}  excluded: {}\n",
        summary.suppressed, summary.unclassified, summary.excluded
    ));
    if summary.duplicates_ignored > 0 {
        text.push_str(&format!(
            "  {} duplicate entries ignored\n",
            summary.duplicates_ignored.to_string().yellow()
        ));
    }
    text
}
