//! # docset-core
//!
//! Classification and indexing pipeline that turns the HTML edition of the
//! OCaml manual into the contents of a Dash docset.
//!
//! Each page is parsed into a small document tree, classified by its `h1`,
//! and then handed to the module or library indexer. Indexers record entries
//! in a SQLite search index and insert Dash table-of-contents anchors into the
//! page; pages that were annotated are written back out.
//!
//! ## Architecture
//!
//! - **HTML model**: tree-sitter based parser into an arena tree that serializes
//!   back byte-for-byte unless modified ([`html`])
//! - **Classification**: module, module type, functor and library-chapter pages
//!   ([`classify`])
//! - **Indexers**: ocamldoc module pages ([`module`]) and library chapters
//!   ([`library`], with declaration patterns in [`grammar`])
//! - **Storage**: the `searchIndex` table ([`store`])
//! - **Driver**: walks the manual and ties the pieces together ([`driver`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docset_core::{DriverOptions, IndexerConfig, run};
//! use std::path::PathBuf;
//!
//! let summary = run(DriverOptions {
//!     input_root: PathBuf::from("ocaml-manual/htmlman"),
//!     index_path: PathBuf::from("OCaml.docset/Contents/Resources/docSet.dsidx"),
//!     output_root: Some(PathBuf::from("OCaml.docset/Contents/Resources/Documents")),
//!     config: IndexerConfig::default(),
//! })?;
//! println!("{} entries from {} pages", summary.entries_inserted, summary.pages);
//! # Ok::<(), docset_core::Error>(())
//! ```

/// Dash table-of-contents markers
pub mod anchor;
/// Page classification by top-level heading
pub mod classify;
/// Indexer configuration
pub mod config;
/// Module-name duplicate suppression
pub mod dedup;
/// Per-run orchestration
pub mod driver;
/// Error types and result aliases
pub mod error;
/// OCaml declaration and heading patterns
pub mod grammar;
/// HTML document tree, parser and serializer
pub mod html;
/// Library chapter indexing
pub mod library;
/// ocamldoc module page indexing
pub mod module;
/// SQLite search index
pub mod store;
/// Core data types
pub mod types;

pub use classify::{Classification, PageKind};
pub use config::{IndexerConfig, UnclassifiedNotes};
pub use driver::{Driver, DriverOptions, RunSummary, run};
pub use error::{Error, Result};
pub use html::{Document, HtmlParser};
pub use store::IndexStore;
pub use types::{Category, IndexEntry, StoredEntry};
