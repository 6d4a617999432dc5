//! Dash table-of-contents anchors.
//!
//! A marker is an empty `<a name="//apple_ref/cpp/<Category>/<label>" class="dashAnchor">`
//! placed directly before the element it describes. Dash scans pages for these
//! to build the per-page sidebar.

use crate::html::{Document, NodeId};
use crate::{Category, Result};

/// Class Dash looks for on marker elements.
pub const ANCHOR_CLASS: &str = "dashAnchor";

const APPLE_REF_PREFIX: &str = "//apple_ref/cpp/";

/// Reference string for a marker: category rendering plus the URL-escaped label.
pub fn anchor_name(category: Category, label: &str) -> String {
    format!("{APPLE_REF_PREFIX}{category}/{}", urlencoding::encode(label))
}

/// Insert a marker immediately before `target`.
///
/// Returns `false` without touching the document when an identical marker
/// already sits in the run of markers directly preceding `target`, which is
/// the case when a page that was annotated by an earlier run is processed again.
pub fn insert_anchor(
    doc: &mut Document,
    target: NodeId,
    category: Category,
    label: &str,
) -> Result<bool> {
    let name = anchor_name(category, label);
    if preceding_markers(doc, target).any(|existing| existing == name) {
        return Ok(false);
    }

    let marker = doc.create_element("a", &[("name", &name), ("class", ANCHOR_CLASS)]);
    doc.insert_before(target, marker)?;
    Ok(true)
}

/// Whether `id` is a marker element.
pub fn is_anchor(doc: &Document, id: NodeId) -> bool {
    doc.tag_name(id) == Some("a")
        && doc.attr(id, "class").as_deref() == Some(ANCHOR_CLASS)
        && doc
            .attr(id, "name")
            .is_some_and(|name| name.starts_with(APPLE_REF_PREFIX))
}

fn preceding_markers(doc: &Document, target: NodeId) -> impl Iterator<Item = String> + '_ {
    doc.preceding_siblings(target)
        .take_while(move |&sibling| is_anchor(doc, sibling))
        .filter_map(move |sibling| doc.attr(sibling, "name").map(|name| name.into_owned()))
}
