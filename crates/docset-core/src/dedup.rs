//! Module-level duplicate suppression.
//!
//! The manual documents several modules more than once under different names.
//! Indexing every copy would give the search index near-identical entries
//! (`Stdlib.List.map` next to `List.map`), so the pages for the redundant
//! names are skipped.
//!
//! ```rust
//! use docset_core::dedup::suppress;
//!
//! // `List.html` sits next to `Stdlib.List.html`.
//! assert!(suppress("Stdlib.List", |m| m == "List"));
//! // No unprefixed page for this one.
//! assert!(!suppress("Stdlib.Weirdmodule", |_| false));
//! ```

/// Name of the standard library's root module.
pub const STDLIB_MODULE_NAME: &str = "Stdlib";

/// Prefix of modules nested in the root module.
pub const STDLIB_MODULE_PREFIX: &str = "Stdlib.";

/// `Pervasives` was superseded by `Stdlib` in OCaml 4.07 and removed in 5.0.
const LEGACY_MODULE_NAMES: &[&str] = &["Pervasives", "Stdlib.Pervasives"];

/// `StdLabels.Foo` re-exports `FooLabels`, which has its own page.
const LABEL_REEXPORT_PREFIX: &str = "StdLabels.";

/// Billed as "for system use only".
const INTERNAL_PREFIX: &str = "Camlinternal";

/// Why a module was left out of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// Superseded module name.
    Legacy,
    /// `Stdlib.Foo` when a page for `Foo` exists.
    ShadowedByUnprefixed,
    /// `StdLabels.Foo` re-export.
    LabelReexport,
    /// Compiler-internal module.
    Internal,
}

impl SuppressReason {
    /// Human-readable reason, used in log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy module name",
            Self::ShadowedByUnprefixed => "documented again without the Stdlib prefix",
            Self::LabelReexport => "label re-export",
            Self::Internal => "internal module",
        }
    }
}

/// First rule that matches `module_name`, if any.
///
/// `page_exists_for` is asked, with the unprefixed remainder, whether a
/// sibling page documents the same module without the `Stdlib.` prefix. It is
/// only called for names carrying that prefix.
pub fn suppression_reason<F>(module_name: &str, page_exists_for: F) -> Option<SuppressReason>
where
    F: Fn(&str) -> bool,
{
    if LEGACY_MODULE_NAMES.contains(&module_name) {
        return Some(SuppressReason::Legacy);
    }
    if let Some(remainder) = module_name.strip_prefix(STDLIB_MODULE_PREFIX) {
        if page_exists_for(remainder) {
            return Some(SuppressReason::ShadowedByUnprefixed);
        }
    }
    if module_name.starts_with(LABEL_REEXPORT_PREFIX) {
        return Some(SuppressReason::LabelReexport);
    }
    if module_name.starts_with(INTERNAL_PREFIX) {
        return Some(SuppressReason::Internal);
    }
    None
}

/// Whether the module's page should be left out of the index.
pub fn suppress<F>(module_name: &str, page_exists_for: F) -> bool
where
    F: Fn(&str) -> bool,
{
    suppression_reason(module_name, page_exists_for).is_some()
}
