use super::document::{Attribute, Document, ElementData, NodeData, NodeId};
use crate::{Error, Result};
use tree_sitter::{Node, Parser};

/// Tree-sitter based HTML parser producing a [`Document`].
///
/// The grammar drops inter-token whitespace, so text is not taken from the
/// grammar's `text` nodes. Instead every byte between two structural children
/// (elements, comments, doctypes) becomes one raw text node. Together with the
/// verbatim start and end tags kept on each element this makes
/// `parse(s).to_html() == s` for any input.
pub struct HtmlParser {
    parser: Parser,
}

impl HtmlParser {
    /// Create a parser with the HTML grammar loaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the grammar cannot be loaded.
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_html::LANGUAGE.into())
            .map_err(|e| Error::Parse(format!("Failed to set language: {e}")))?;

        Ok(Self { parser })
    }

    /// Parse a page into a document tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if tree-sitter produces no tree.
    pub fn parse(&mut self, text: &str) -> Result<Document> {
        let tree = self
            .parser
            .parse(text, None)
            .ok_or_else(|| Error::Parse("Failed to parse HTML".into()))?;

        let root = tree.root_node();
        if root.has_error() {
            tracing::debug!("HTML parse tree contains errors, affected markup is kept as text");
        }

        let mut doc = Document::new();
        let doc_root = doc.root();
        let mut pos = 0;
        build_children(&mut doc, doc_root, root, text, &mut pos);
        flush_text(&mut doc, doc_root, text, &mut pos, text.len());
        Ok(doc)
    }
}

/// Walk the children of `node`, attaching structural ones under `parent` and
/// turning everything in between into raw text.
fn build_children(doc: &mut Document, parent: NodeId, node: Node, text: &str, pos: &mut usize) {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();

    for child in children {
        match child.kind() {
            "element" | "script_element" | "style_element" => {
                if child.start_byte() < *pos {
                    continue;
                }
                let start = child.start_byte();
                // Elements without a usable start tag are left as text.
                let Some(data) = element_data(child, text) else {
                    continue;
                };
                flush_text(doc, parent, text, pos, start);
                build_element(doc, parent, child, data, text, pos);
            },
            "comment" | "doctype" => {
                if child.start_byte() < *pos {
                    continue;
                }
                flush_text(doc, parent, text, pos, child.start_byte());
                let raw = text[child.byte_range()].to_string();
                let data = if child.kind() == "comment" {
                    NodeData::Comment(raw)
                } else {
                    NodeData::Doctype(raw)
                };
                doc.append(parent, data);
                *pos = child.end_byte();
            },
            // Recovered regions may still contain well-formed elements. An
            // element whose end tag is missing here (`<h2>I<h3>J</h3>`) has no
            // element node of its own and survives only as text.
            "ERROR" => build_children(doc, parent, child, text, pos),
            _ => {},
        }
    }
}

fn build_element(
    doc: &mut Document,
    parent: NodeId,
    node: Node,
    mut data: ElementData,
    text: &str,
    pos: &mut usize,
) {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();

    let content_start = children
        .first()
        .map_or(node.start_byte(), tree_sitter::Node::end_byte);
    let end_tag = children.last().filter(|last| last.kind() == "end_tag");
    let content_end = end_tag.map_or(node.end_byte(), tree_sitter::Node::start_byte);
    data.end_tag = end_tag.map(|tag| text[tag.byte_range()].to_string());

    let self_closing = data.self_closing;
    let id = doc.append(parent, NodeData::Element(data));
    *pos = content_start;

    if !self_closing {
        build_children(doc, id, node, text, pos);
        flush_text(doc, id, text, pos, content_end);
    }
    *pos = node.end_byte();
}

/// Tag name, attributes and verbatim start tag of an element node.
fn element_data(node: Node, text: &str) -> Option<ElementData> {
    let mut cursor = node.walk();
    let tag = node.children(&mut cursor).next()?;
    let self_closing = match tag.kind() {
        "start_tag" => false,
        "self_closing_tag" => true,
        _ => return None,
    };

    let mut name = None;
    let mut attributes = Vec::new();
    let mut tag_cursor = tag.walk();
    for part in tag.children(&mut tag_cursor) {
        match part.kind() {
            "tag_name" => name = Some(text[part.byte_range()].to_ascii_lowercase()),
            "attribute" => attributes.push(attribute(part, text)),
            _ => {},
        }
    }

    Some(ElementData {
        name: name?,
        attributes,
        start_tag: Some(text[tag.byte_range()].to_string()),
        end_tag: None,
        self_closing,
    })
}

fn attribute(node: Node, text: &str) -> Attribute {
    let mut name = String::new();
    let mut value = None;
    let mut cursor = node.walk();
    for part in node.children(&mut cursor) {
        match part.kind() {
            "attribute_name" => name = text[part.byte_range()].to_string(),
            "attribute_value" => value = Some(text[part.byte_range()].to_string()),
            "quoted_attribute_value" => {
                // `""` has no inner attribute_value node.
                let mut inner = part.walk();
                let raw = part
                    .children(&mut inner)
                    .find(|piece| piece.kind() == "attribute_value")
                    .map(|piece| text[piece.byte_range()].to_string())
                    .unwrap_or_default();
                value = Some(raw);
            },
            _ => {},
        }
    }
    Attribute { name, value }
}

fn flush_text(doc: &mut Document, parent: NodeId, text: &str, pos: &mut usize, until: usize) {
    if until > *pos {
        doc.append(parent, NodeData::Text(text[*pos..until].to_string()));
        *pos = until;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Document {
        HtmlParser::new().unwrap().parse(html).unwrap()
    }

    #[test]
    fn test_finds_headings_and_attributes() {
        let doc = parse(r#"<html><body><h1 id="top">Module <a href="List.html">List</a></h1></body></html>"#);
        let h1 = doc.find_first(doc.root(), "h1").unwrap();
        assert_eq!(doc.attr(h1, "id").unwrap(), "top");
        assert_eq!(doc.stripped_strings(h1), vec!["Module", "List"]);
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_unquoted_bare_and_empty_attributes() {
        let doc = parse(r#"<input type=checkbox checked value="">"#);
        let input = doc.find_first(doc.root(), "input").unwrap();
        assert_eq!(doc.attr(input, "type").unwrap(), "checkbox");
        assert_eq!(doc.attr(input, "checked").unwrap(), "");
        assert_eq!(doc.attr(input, "value").unwrap(), "");
    }

    #[test]
    fn test_text_keeps_entities_encoded_until_read() {
        let doc = parse("<pre>val f : int -&gt; int</pre>");
        let pre = doc.find_first(doc.root(), "pre").unwrap();
        assert_eq!(doc.collapsed_text(pre), "val f : int -> int");
    }

    #[test]
    fn test_nested_elements_keep_document_order() {
        let doc = parse("<div><h2 id=a>A</h2><p>x</p><h3 id=b>B</h3></div>");
        let headings = doc.elements_named(&["h2", "h3"]);
        assert_eq!(headings.len(), 2);
        assert_eq!(doc.tag_name(headings[0]), Some("h2"));
        assert_eq!(doc.tag_name(headings[1]), Some("h3"));
    }

    #[test]
    fn test_script_contents_are_opaque() {
        let doc = parse("<script>if (a < b) { x(); }</script><h1>Module X</h1>");
        assert!(doc.find_first(doc.root(), "h1").is_some());
        let script = doc.find_first(doc.root(), "script").unwrap();
        assert_eq!(doc.collapsed_text(script), "if (a < b) { x(); }");
    }
}
