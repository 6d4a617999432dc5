//! Indexing of the manual's library chapters.
//!
//! Chapters such as "The unix library" are hand-written pages, not ocamldoc
//! output, so there are no structured ids to go by. Declarations are recognised
//! from the text of `pre` blocks instead (see [`crate::grammar`]), and blocks
//! that get an entry are given an id if they lack one.

use crate::anchor::insert_anchor;
use crate::grammar::{Declaration, match_declaration};
use crate::html::{Document, NodeId};
use crate::store::IndexStore;
use crate::{Category, IndexEntry, Result};
use std::collections::HashSet;
use tracing::debug;

/// Hands out `autoid_0000`, `autoid_0001`, ... for one page, skipping ids the
/// page already uses.
#[derive(Debug)]
pub struct AutoIds {
    next: u32,
    taken: HashSet<String>,
}

impl AutoIds {
    /// Collect the ids already present in `doc`.
    pub fn for_document(doc: &Document) -> Self {
        let taken = doc
            .descendants(doc.root())
            .filter_map(|node| doc.attr(node, "id").map(|id| id.into_owned()))
            .collect();
        Self { next: 0, taken }
    }

    fn allocate(&mut self) -> String {
        loop {
            let candidate = format!("autoid_{:04x}", self.next);
            self.next += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// The element's id, assigning a fresh one (and marking the page modified) if it has none.
    pub fn ensure_id(&mut self, doc: &mut Document, element: NodeId) -> Result<String> {
        if let Some(id) = doc.attr(element, "id") {
            return Ok(id.into_owned());
        }
        let id = self.allocate();
        doc.set_attr(element, "id", &id)?;
        Ok(id)
    }
}

/// Index a library chapter: the library itself, then the type and exception
/// declarations in its `pre` blocks. Returns the number of declarations found.
pub fn index_library(
    doc: &mut Document,
    store: &mut IndexStore,
    library: &str,
    heading: NodeId,
    path: &str,
) -> Result<usize> {
    let mut entry = IndexEntry::new(library, Category::Library, path);
    if let Some(id) = doc.attr(heading, "id") {
        entry = entry.with_fragment(id);
    }
    store.insert_ignore(&entry)?;

    let mut ids = AutoIds::for_document(doc);
    let mut found = 0;
    for block in doc.elements_named(&["pre"]) {
        let Some(declaration) = match_declaration(&doc.collapsed_text(block)) else {
            continue;
        };
        let id = ids.ensure_id(doc, block)?;
        let at = |name: &str, category| IndexEntry::new(name, category, path).with_fragment(id.as_str());

        match declaration {
            Declaration::Type(decl) => {
                store.insert_ignore(&at(&decl.name, Category::Type))?;
                insert_anchor(doc, block, Category::Type, &decl.name)?;
                for constructor in &decl.constructors {
                    store.insert_ignore(&at(constructor, Category::Constructor))?;
                    insert_anchor(doc, block, Category::Constructor, constructor)?;
                }
            },
            Declaration::Exception(name) => {
                store.insert_ignore(&at(&name, Category::Exception))?;
                insert_anchor(doc, block, Category::Exception, &name)?;
            },
        }
        found += 1;
    }

    debug!(library, path, declarations = found, "indexed library chapter");
    Ok(found)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::StoredEntry;
    use crate::html::HtmlParser;
    use pretty_assertions::assert_eq;

    fn run(html: &str) -> (Document, Vec<StoredEntry>, usize) {
        let mut doc = HtmlParser::new().unwrap().parse(html).unwrap();
        let heading = doc.find_first(doc.root(), "h1").unwrap();
        let mut store = IndexStore::open_in_memory().unwrap();
        let found = index_library(&mut doc, &mut store, "unix", heading, "libunix.html").unwrap();
        let entries = store.entries().unwrap();
        (doc, entries, found)
    }

    fn entry(name: &str, kind: &str, path: &str) -> StoredEntry {
        StoredEntry {
            name: name.to_string(),
            kind: kind.to_string(),
            path: path.to_string(),
        }
    }

    const HEADING: &str = r#"<h1 id="c:unix">Chapter 30 The unix library</h1>"#;

    #[test]
    fn test_variant_type_block() {
        let html = format!("{HEADING}<pre>type 'a t = A | B of int</pre>");
        let (doc, entries, found) = run(&html);

        assert_eq!(found, 1);
        assert_eq!(
            entries,
            vec![
                entry("unix", "Library", "libunix.html#c:unix"),
                entry("t", "Type", "libunix.html#autoid_0000"),
                entry("A", "Constructor", "libunix.html#autoid_0000"),
                entry("B", "Constructor", "libunix.html#autoid_0000"),
            ]
        );
        assert!(doc.to_html().ends_with(concat!(
            r#"<a name="//apple_ref/cpp/Type/t" class="dashAnchor"></a>"#,
            r#"<a name="//apple_ref/cpp/Constructor/A" class="dashAnchor"></a>"#,
            r#"<a name="//apple_ref/cpp/Constructor/B" class="dashAnchor"></a>"#,
            r#"<pre id="autoid_0000">type 'a t = A | B of int</pre>"#,
        )));
    }

    #[test]
    fn test_exception_block() {
        let html = format!("{HEADING}<pre>exception Foo of string</pre>");
        let (doc, entries, _) = run(&html);
        assert_eq!(
            entries[1..].to_vec(),
            vec![entry("Foo", "Exception", "libunix.html#autoid_0000")]
        );
        assert_eq!(doc.to_html().matches("dashAnchor").count(), 1);
    }

    #[test]
    fn test_markup_inside_block_is_collapsed() {
        let html = format!(
            "{HEADING}<pre id=\"decl\">type <a href=\"#t\">file_perm</a>\n  = int</pre>"
        );
        let (_, entries, _) = run(&html);
        assert_eq!(entries[1], entry("file_perm", "Type", "libunix.html#decl"));
        assert_eq!(entries[2], entry("int", "Constructor", "libunix.html#decl"));
    }

    #[test]
    fn test_unmatched_blocks_leave_page_untouched() {
        let html = format!("{HEADING}<pre>val sleep : float -&gt; unit</pre>");
        let (doc, entries, found) = run(&html);
        assert_eq!(found, 0);
        assert_eq!(entries.len(), 1);
        assert!(!doc.is_modified());
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn test_autoids_skip_existing_and_count_per_page() {
        let html = format!(
            "{HEADING}<p id=\"autoid_0000\"></p><pre>type a</pre><pre>type b</pre>"
        );
        let (doc, entries, _) = run(&html);
        assert_eq!(entries[1].path, "libunix.html#autoid_0001");
        assert_eq!(entries[2].path, "libunix.html#autoid_0002");
        assert!(doc.to_html().contains(r#"<pre id="autoid_0002">type b</pre>"#));
    }

    #[test]
    fn test_library_without_heading_id_points_at_page() {
        let (_, entries, _) = run("<h1>Chapter 29 The str library</h1>");
        assert_eq!(entries, vec![entry("unix", "Library", "libunix.html")]);
    }

    #[test]
    fn test_second_pass_over_output_changes_nothing() {
        let html = format!("{HEADING}<pre>type 'a t = A | B of int</pre><pre>exception E</pre>");
        let (first, first_entries, _) = run(&html);
        let annotated = first.to_html();

        let (second, second_entries, _) = run(&annotated);
        assert!(!second.is_modified());
        assert_eq!(second.to_html(), annotated);
        assert_eq!(first_entries, second_entries);
    }
}
