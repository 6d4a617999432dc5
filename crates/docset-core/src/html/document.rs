//! Arena-based HTML document tree.
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`]. Each
//! node keeps an ordered child list, so "insert before" is an index lookup in
//! the parent's children followed by `Vec::insert`. Ids stay valid for the
//! lifetime of the document: nothing is ever removed from the arena.
//!
//! Text and attribute values are stored exactly as they appeared in the
//! source (entities still encoded). Accessors such as [`Document::attr`] and
//! [`Document::strings`] decode on the way out.

use crate::{Error, Result};
use html_escape::{decode_html_entities, encode_double_quoted_attribute};
use std::borrow::Cow;

/// Compact node identifier (index into the arena).
pub type NodeId = usize;

/// One attribute of an element, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Name as written in the source.
    pub name: String,
    /// Raw value as written in the source. `None` for bare attributes like `<option selected>`.
    pub value: Option<String>,
}

/// Element payload.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercased tag name.
    pub name: String,
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Start tag exactly as it appeared in the source. Dropped once an attribute
    /// changes, after which the tag is rendered from `attributes`.
    pub(crate) start_tag: Option<String>,
    /// End tag text. `None` for void, self-closing and implicitly closed elements.
    pub(crate) end_tag: Option<String>,
    pub(crate) self_closing: bool,
}

/// Payload of a node.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// The document itself; parent of top-level nodes.
    Root,
    /// An element and its tags.
    Element(ElementData),
    /// Raw character data between structural nodes.
    Text(String),
    /// Full comment text, delimiters included.
    Comment(String),
    /// Full doctype declaration.
    Doctype(String),
}

/// One node of the arena.
#[derive(Debug, Clone)]
pub struct Node {
    /// What the node holds.
    pub data: NodeData,
    /// `None` for the root and for detached nodes.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
}

/// A parsed page.
///
/// The `modified` flag starts out false and is raised by every mutating
/// operation; the driver only writes pages back when it is set.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    modified: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Root,
                parent: None,
                children: Vec::new(),
            }],
            modified: false,
        }
    }

    /// The root node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        0
    }

    /// Whether any mutating operation has run since parsing.
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Node by id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Append a node as the last child of `parent`. Used while building a tree;
    /// does not touch the modified flag.
    pub(crate) fn append(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Allocate a detached element with the given attributes and an explicit end tag.
    pub fn create_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> NodeId {
        let id = self.nodes.len();
        let name = name.to_ascii_lowercase();
        self.nodes.push(Node {
            data: NodeData::Element(ElementData {
                end_tag: Some(format!("</{name}>")),
                name,
                attributes: attributes
                    .iter()
                    .map(|(key, value)| Attribute {
                        name: (*key).to_string(),
                        value: Some(encode_double_quoted_attribute(value).into_owned()),
                    })
                    .collect(),
                start_tag: None,
                self_closing: false,
            }),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Insert the detached node `new` as the immediate preceding sibling of `target`.
    pub fn insert_before(&mut self, target: NodeId, new: NodeId) -> Result<()> {
        let parent = self.nodes[target]
            .parent
            .ok_or_else(|| Error::Document(format!("node {target} has no parent")))?;
        if self.nodes[new].parent.is_some() {
            return Err(Error::Document(format!("node {new} is already attached")));
        }
        let position = self.position_in_parent(parent, target)?;
        self.nodes[parent].children.insert(position, new);
        self.nodes[new].parent = Some(parent);
        self.modified = true;
        Ok(())
    }

    /// Siblings of `id` that come before it, nearest first.
    pub fn preceding_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let siblings: &[NodeId] = match self.nodes[id].parent {
            Some(parent) => {
                let children = &self.nodes[parent].children;
                let end = children.iter().position(|&c| c == id).unwrap_or(0);
                &children[..end]
            },
            None => &[],
        };
        siblings.iter().rev().copied()
    }

    fn position_in_parent(&self, parent: NodeId, child: NodeId) -> Result<usize> {
        self.nodes[parent]
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or_else(|| Error::Document(format!("node {child} missing from its parent")))
    }

    /// Element payload, or `None` for non-element nodes.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id].data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[id].data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Tag name of an element node.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.name.as_str())
    }

    /// Decoded value of an attribute. Bare attributes read as the empty string.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<Cow<'_, str>> {
        let element = self.element(id)?;
        let attribute = element
            .attributes
            .iter()
            .find(|attribute| attribute.name.eq_ignore_ascii_case(name))?;
        Some(match &attribute.value {
            Some(raw) => decode_html_entities(raw),
            None => Cow::Borrowed(""),
        })
    }

    /// Set (or add) an attribute, escaping `value`.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self
            .element_mut(id)
            .ok_or_else(|| Error::Document(format!("node {id} is not an element")))?;
        let encoded = encode_double_quoted_attribute(value).into_owned();
        match element
            .attributes
            .iter_mut()
            .find(|attribute| attribute.name.eq_ignore_ascii_case(name))
        {
            Some(existing) => existing.value = Some(encoded),
            None => element.attributes.push(Attribute {
                name: name.to_string(),
                value: Some(encoded),
            }),
        }
        element.start_tag = None;
        self.modified = true;
        Ok(())
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> bool {
        let Some(element) = self.element_mut(id) else {
            return false;
        };
        let before = element.attributes.len();
        element
            .attributes
            .retain(|attribute| !attribute.name.eq_ignore_ascii_case(name));
        if element.attributes.len() == before {
            return false;
        }
        element.start_tag = None;
        self.modified = true;
        true
    }

    /// Pre-order traversal of everything below `id` (excluding `id` itself).
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.nodes[id].children.clone();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// Elements whose tag is one of `names`, in document order.
    pub fn elements_named(&self, names: &[&str]) -> Vec<NodeId> {
        self.descendants(self.root())
            .filter(|&id| self.tag_name(id).is_some_and(|tag| names.contains(&tag)))
            .collect()
    }

    /// First element with tag `name` below `id`, in document order.
    pub fn find_first(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(id)
            .find(|&node| self.tag_name(node) == Some(name))
    }

    /// Decoded text of every text node below `id`, in document order.
    pub fn strings(&self, id: NodeId) -> Vec<String> {
        self.descendants(id)
            .filter_map(|node| match &self.nodes[node].data {
                NodeData::Text(raw) => Some(decode_html_entities(raw).into_owned()),
                _ => None,
            })
            .collect()
    }

    /// Like [`Document::strings`] but trimmed, with whitespace-only strings dropped.
    pub fn stripped_strings(&self, id: NodeId) -> Vec<String> {
        self.strings(id)
            .into_iter()
            .filter_map(|text| {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .collect()
    }

    /// All text below `id` with runs of whitespace collapsed to single spaces.
    pub fn collapsed_text(&self, id: NodeId) -> String {
        self.strings(id)
            .iter()
            .flat_map(|text| text.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Iterator returned by [`Document::descendants`].
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.nodes[id].children.iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.append(
            doc.root(),
            NodeData::Element(ElementData {
                name: "body".to_string(),
                attributes: Vec::new(),
                start_tag: Some("<body>".to_string()),
                end_tag: Some("</body>".to_string()),
                self_closing: false,
            }),
        );
        let heading = doc.append(
            body,
            NodeData::Element(ElementData {
                name: "h2".to_string(),
                attributes: vec![Attribute {
                    name: "id".to_string(),
                    value: Some("1_A&amp;B".to_string()),
                }],
                start_tag: Some("<h2 id=\"1_A&amp;B\">".to_string()),
                end_tag: Some("</h2>".to_string()),
                self_closing: false,
            }),
        );
        doc.append(heading, NodeData::Text("  A &amp; B  ".to_string()));
        (doc, body, heading)
    }

    #[test]
    fn test_fresh_document_is_unmodified() {
        let (doc, _, _) = sample();
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_attr_decodes_entities() {
        let (doc, _, heading) = sample();
        assert_eq!(doc.attr(heading, "id").unwrap(), "1_A&B");
        assert!(doc.attr(heading, "class").is_none());
    }

    #[test]
    fn test_insert_before_places_node_first_and_marks_modified() {
        let (mut doc, body, heading) = sample();
        let marker = doc.create_element("a", &[("name", "x")]);
        doc.insert_before(heading, marker).unwrap();

        assert_eq!(doc.node(body).children, vec![marker, heading]);
        assert_eq!(doc.node(marker).parent, Some(body));
        assert!(doc.is_modified());
        assert_eq!(doc.preceding_siblings(heading).collect::<Vec<_>>(), vec![marker]);
    }

    #[test]
    fn test_insert_before_root_is_an_error() {
        let (mut doc, _, _) = sample();
        let marker = doc.create_element("a", &[]);
        let root = doc.root();
        assert!(matches!(
            doc.insert_before(root, marker),
            Err(Error::Document(_))
        ));
    }

    #[test]
    fn test_remove_attr_reports_presence() {
        let (mut doc, body, heading) = sample();
        assert!(!doc.remove_attr(body, "href"));
        assert!(!doc.is_modified());
        assert!(doc.remove_attr(heading, "id"));
        assert!(doc.is_modified());
        assert!(doc.attr(heading, "id").is_none());
    }

    #[test]
    fn test_text_helpers() {
        let (doc, body, _) = sample();
        assert_eq!(doc.strings(body), vec!["  A & B  ".to_string()]);
        assert_eq!(doc.stripped_strings(body), vec!["A & B".to_string()]);
        assert_eq!(doc.collapsed_text(body), "A & B");
    }

    #[test]
    fn test_descendants_are_preorder() {
        let (doc, body, heading) = sample();
        let order: Vec<NodeId> = doc.descendants(doc.root()).collect();
        assert_eq!(order, vec![body, heading, heading + 1]);
        assert_eq!(doc.elements_named(&["h2", "h3"]), vec![heading]);
        assert_eq!(doc.find_first(doc.root(), "h2"), Some(heading));
    }
}
