//! Page classification from the top-level heading.
//!
//! ocamldoc titles module pages `Module List`, `Module type Sig` or
//! `Functor Hashtbl.Make`; the manual's library chapters read
//! `Chapter 30 The unix library: Unix system calls`. Anything else is not an
//! entity page as far as the index is concerned.

use crate::config::UnclassifiedNotes;
use crate::grammar;
use crate::html::{Document, NodeId};
use crate::Category;

/// What a page documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    /// A module, functor or module type page. `category` is `Module` or `Interface`.
    Module {
        /// Module name as given in the heading.
        name: String,
        /// Either [`Category::Module`] or [`Category::Interface`].
        category: Category,
    },
    /// A library chapter of the manual.
    Library {
        /// Library name, e.g. `unix`.
        name: String,
    },
    /// Neither a module nor a library page.
    Unclassified,
}

/// Result of looking at a page's `h1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The first `h1`, if the page has one.
    pub heading: Option<NodeId>,
    /// What the heading says the page documents.
    pub kind: PageKind,
}

/// Classify a page by its first `h1`.
pub fn classify(doc: &Document) -> Classification {
    let Some(heading) = doc.find_first(doc.root(), "h1") else {
        return Classification {
            heading: None,
            kind: PageKind::Unclassified,
        };
    };
    Classification {
        heading: Some(heading),
        kind: classify_heading(&doc.stripped_strings(heading)),
    }
}

/// Classify the stripped text pieces of a heading.
///
/// The module keywords are checked before the library-chapter pattern.
pub fn classify_heading(tokens: &[String]) -> PageKind {
    let words: Vec<&str> = tokens
        .iter()
        .flat_map(|token| token.split_whitespace())
        .collect();

    match words.as_slice() {
        ["Module", "type", name, ..] => {
            return PageKind::Module {
                name: (*name).to_string(),
                category: Category::Interface,
            };
        },
        ["Module", "type"] => return PageKind::Unclassified,
        ["Module" | "Functor", name, ..] => {
            return PageKind::Module {
                name: (*name).to_string(),
                category: Category::Module,
            };
        },
        _ => {},
    }

    grammar::library_name(&tokens.join(" ")).map_or(PageKind::Unclassified, |name| {
        PageKind::Library {
            name: name.to_string(),
        }
    })
}

/// Whether an unclassified page deserves a diagnostic note.
///
/// Under [`UnclassifiedNotes::Filtered`], pages whose file name starts with one
/// of `quiet_prefixes` (ocamldoc's `type_*.html` and `index_*.html` listings)
/// are skipped silently.
pub fn should_note_unclassified(
    file_name: &str,
    notes: UnclassifiedNotes,
    quiet_prefixes: &[String],
) -> bool {
    match notes {
        UnclassifiedNotes::All => true,
        UnclassifiedNotes::None => false,
        UnclassifiedNotes::Filtered => !quiet_prefixes
            .iter()
            .any(|prefix| file_name.starts_with(prefix.as_str())),
    }
}
