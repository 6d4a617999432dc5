//! Indexer configuration.
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! behaviour needed for the stock OCaml manual. Values from the command line
//! are applied on top by the CLI.
//!
//! ## Example Configuration File
//!
//! ```toml
//! exclude = ["**/compilerlibref/*", "**/ocamldoc-old/*"]
//! unclassified_notes = "filtered"
//! quiet_prefixes = ["type_", "index_"]
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Compiler-libs reference pages are a separate manual with their own docset.
pub const DEFAULT_EXCLUDE: &str = "**/compilerlibref/*";

/// How chatty to be about pages that are neither module nor library pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnclassifiedNotes {
    /// Note every unclassified page.
    All,
    /// Skip pages whose file name starts with one of the quiet prefixes.
    #[default]
    Filtered,
    /// Never note unclassified pages.
    None,
}

/// Settings for one indexing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Globs matched against root-relative page paths; matching pages are skipped.
    pub exclude: Vec<String>,
    /// Which unclassified pages get an informational log line.
    pub unclassified_notes: UnclassifiedNotes,
    /// File-name prefixes of known non-entity pages (ocamldoc's type and index listings).
    pub quiet_prefixes: Vec<String>,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            exclude: vec![DEFAULT_EXCLUDE.to_string()],
            unclassified_notes: UnclassifiedNotes::default(),
            quiet_prefixes: vec!["type_".to_string(), "index_".to_string()],
        }
    }
}

impl IndexerConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or is not valid TOML
    /// for this structure.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `content` is not valid TOML for this structure.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
