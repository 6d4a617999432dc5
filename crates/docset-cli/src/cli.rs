//! # CLI Structure and Argument Parsing
//!
//! `docset-index` takes the unpacked HTML manual and the path of the search
//! index to build:
//!
//! ```bash
//! # Annotate pages in place
//! docset-index ocaml-manual/htmlman OCaml.docset/Contents/Resources/docSet.dsidx
//!
//! # Write annotated pages into the docset instead
//! docset-index ocaml-manual/htmlman OCaml.docset/Contents/Resources/docSet.dsidx \
//!     --output OCaml.docset/Contents/Resources/Documents
//! ```
//!
//! Settings not given on the command line come from the configuration file
//! (`--config` or `DOCSET_INDEX_CONFIG`), then from built-in defaults.

use clap::{Parser, ValueEnum};
use docset_core::UnclassifiedNotes;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Annotate the OCaml HTML manual for Dash and build its search index
#[derive(Parser, Clone, Debug)]
#[command(name = "docset-index")]
#[command(version)]
#[command(about = "Annotate the OCaml HTML manual for Dash and build its search index", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Root of the unpacked HTML manual
    #[arg(value_name = "MANUAL_DIR")]
    pub manual_dir: PathBuf,

    /// Search index file to create (replaced if it exists)
    #[arg(value_name = "INDEX_DB")]
    pub index_db: PathBuf,

    /// Directory for annotated pages (defaults to MANUAL_DIR, i.e. in place)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Skip pages whose manual-relative path matches GLOB (repeatable, replaces configured globs)
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Path to configuration file. Also via `DOCSET_INDEX_CONFIG`.
    #[arg(long, value_name = "FILE", env = "DOCSET_INDEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Which unclassified pages to mention
    #[arg(long, value_enum, value_name = "WHICH")]
    pub unclassified_notes: Option<NotesArg>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Cli {
    pub const fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Command-line spelling of [`UnclassifiedNotes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NotesArg {
    /// Every page without a module or library heading
    All,
    /// All but ocamldoc's type and index listings (default)
    Filtered,
    /// None
    None,
}

impl From<NotesArg> for UnclassifiedNotes {
    fn from(arg: NotesArg) -> Self {
        match arg {
            NotesArg::All => Self::All,
            NotesArg::Filtered => Self::Filtered,
            NotesArg::None => Self::None,
        }
    }
}
