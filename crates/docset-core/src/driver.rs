//! One indexing run over a manual tree.
//!
//! Pages are processed one at a time in a fixed order: read, parse, classify,
//! index, and write back if anything changed. The search index is recreated at
//! the start of the run and committed at the end.

use crate::classify::{PageKind, classify, should_note_unclassified};
use crate::config::IndexerConfig;
use crate::html::{Document, HtmlParser};
use crate::library::index_library;
use crate::module::{ModuleOutcome, ModulePage, index_module};
use crate::store::IndexStore;
use crate::{Category, Error, Result};
use glob::{MatchOptions, Pattern};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// Where to read from and write to.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Root of the unpacked manual.
    pub input_root: PathBuf,
    /// SQLite file to (re)create.
    pub index_path: PathBuf,
    /// Where rewritten pages go. `None` rewrites them in place.
    pub output_root: Option<PathBuf>,
    /// Exclusions and logging preferences.
    pub config: IndexerConfig,
}

/// Counters for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Pages read and classified.
    pub pages: usize,
    /// Pages skipped by an exclusion glob.
    pub excluded: usize,
    /// Module and functor pages indexed.
    pub modules: usize,
    /// Module type pages indexed.
    pub interfaces: usize,
    /// Library chapters indexed.
    pub libraries: usize,
    /// Module pages left out as duplicates or internals.
    pub suppressed: usize,
    /// Pages with neither a module nor a library heading.
    pub unclassified: usize,
    /// Pages written back because they were annotated.
    pub rewritten: usize,
    /// Rows added to the search index.
    pub entries_inserted: usize,
    /// Inserts that hit an existing row.
    pub duplicates_ignored: usize,
}

/// Drives the pipeline over every page under the input root.
pub struct Driver {
    options: DriverOptions,
    exclude: Vec<Pattern>,
    parser: HtmlParser,
}

impl Driver {
    /// Validate the options and compile the exclusion globs.
    pub fn new(options: DriverOptions) -> Result<Self> {
        if !options.input_root.is_dir() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("manual directory not found: {}", options.input_root.display()),
            )));
        }
        let exclude = options
            .config
            .exclude
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| Error::Pattern {
                    pattern: pattern.clone(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            options,
            exclude,
            parser: HtmlParser::new()?,
        })
    }

    /// Run over every page and return the counters.
    pub fn run(mut self) -> Result<RunSummary> {
        let mut store = IndexStore::create(&self.options.index_path)?;
        let mut summary = RunSummary::default();

        for page in self.collect_pages()? {
            let rel = relative_path(&self.options.input_root, &page);
            if self.is_excluded(&rel) {
                debug!("excluded {rel}");
                summary.excluded += 1;
                continue;
            }
            self.process_page(&mut store, &page, &rel, &mut summary)?;
        }

        summary.entries_inserted = store.inserted();
        summary.duplicates_ignored = store.ignored();
        store.finalize()?;

        info!(
            pages = summary.pages,
            entries = summary.entries_inserted,
            rewritten = summary.rewritten,
            "indexing finished"
        );
        Ok(summary)
    }

    /// All `.html` files under the input root, collected before anything is
    /// written so pages rewritten into the same tree are not picked up again.
    fn collect_pages(&self) -> Result<Vec<PathBuf>> {
        let mut pages = Vec::new();
        for entry in WalkDir::new(&self.options.input_root).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            let is_html = entry.path().extension().is_some_and(|ext| ext == "html");
            if entry.file_type().is_file() && is_html {
                pages.push(entry.into_path());
            }
        }
        Ok(pages)
    }

    fn is_excluded(&self, rel: &str) -> bool {
        self.exclude
            .iter()
            .any(|pattern| pattern.matches_with(rel, MatchOptions::new()))
    }

    fn process_page(
        &mut self,
        store: &mut IndexStore,
        page: &Path,
        rel: &str,
        summary: &mut RunSummary,
    ) -> Result<()> {
        debug!("processing {rel}");
        let bytes = fs::read(page)?;
        let text =
            String::from_utf8(bytes).map_err(|e| Error::Parse(format!("{rel} is not UTF-8: {e}")))?;
        let mut doc = self.parser.parse(&text)?;
        summary.pages += 1;

        let page_dir = page.parent().unwrap_or_else(|| Path::new(""));
        let page_exists_for = |module: &str| page_dir.join(format!("{module}.html")).is_file();

        let classification = classify(&doc);
        match (classification.heading, classification.kind) {
            (
                Some(heading),
                PageKind::Module {
                    name,
                    category: category @ (Category::Module | Category::Interface),
                },
            ) => {
                let module = ModulePage {
                    name: &name,
                    category,
                    heading,
                    path: rel,
                };
                match index_module(&mut doc, store, &module, page_exists_for)? {
                    ModuleOutcome::Suppressed(_) => summary.suppressed += 1,
                    ModuleOutcome::Indexed if category == Category::Interface => {
                        summary.interfaces += 1;
                    },
                    ModuleOutcome::Indexed => summary.modules += 1,
                }
            },
            (Some(heading), PageKind::Library { name }) => {
                index_library(&mut doc, store, &name, heading, rel)?;
                summary.libraries += 1;
            },
            (heading, PageKind::Unclassified) => {
                summary.unclassified += 1;
                let file_name = rel.rsplit('/').next().unwrap_or(rel);
                let config = &self.options.config;
                if should_note_unclassified(file_name, config.unclassified_notes, &config.quiet_prefixes) {
                    if heading.is_some() {
                        info!("no recognisable library or module in {rel}");
                    } else {
                        info!("no h1 tag in {rel}");
                    }
                }
            },
            (heading, kind) => {
                error!(
                    severity = "critical",
                    path = rel,
                    has_heading = heading.is_some(),
                    ?kind,
                    "unexpected page classification, page skipped"
                );
                summary.unclassified += 1;
            },
        }

        if doc.is_modified() {
            self.write_page(&doc, rel)?;
            summary.rewritten += 1;
        }
        Ok(())
    }

    fn write_page(&self, doc: &Document, rel: &str) -> Result<()> {
        let output_root = self
            .options
            .output_root
            .as_deref()
            .unwrap_or(&self.options.input_root);
        let target = rel.split('/').fold(output_root.to_path_buf(), |path, part| path.join(part));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, doc.to_html())?;
        debug!("wrote {}", target.display());
        Ok(())
    }
}

/// Index the manual described by `options`.
pub fn run(options: DriverOptions) -> Result<RunSummary> {
    Driver::new(options)?.run()
}

/// Root-relative path with `/` separators.
fn relative_path(root: &Path, page: &Path) -> String {
    let rel = page.strip_prefix(root).unwrap_or(page);
    rel.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
