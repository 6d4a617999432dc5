use super::document::{Document, ElementData, NodeData, NodeId};

impl Document {
    /// Serialize the tree back to HTML.
    ///
    /// Untouched elements are written with their original start and end tags,
    /// so an unmodified document reproduces its input byte for byte.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_node(self.root(), &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        match &node.data {
            NodeData::Root => self.write_children(id, out),
            NodeData::Text(raw) | NodeData::Comment(raw) | NodeData::Doctype(raw) => {
                out.push_str(raw);
            },
            NodeData::Element(element) => {
                match &element.start_tag {
                    Some(raw) => out.push_str(raw),
                    None => render_start_tag(element, out),
                }
                self.write_children(id, out);
                if let Some(end) = &element.end_tag {
                    out.push_str(end);
                }
            },
        }
    }

    fn write_children(&self, id: NodeId, out: &mut String) {
        for &child in &self.node(id).children {
            self.write_node(child, out);
        }
    }
}

fn render_start_tag(element: &ElementData, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for attribute in &element.attributes {
        out.push(' ');
        out.push_str(&attribute.name);
        if let Some(value) = &attribute.value {
            // Values that came from single-quoted source may hold a raw `"`.
            let quote = if value.contains('"') { '\'' } else { '"' };
            out.push('=');
            out.push(quote);
            out.push_str(value);
            out.push(quote);
        }
    }
    if element.self_closing {
        out.push_str(" /");
    }
    out.push('>');
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::html::HtmlParser;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<link rel="stylesheet" href="style.css" type="text/css">
<title>List</title>
</head>
<body>
<!-- generated -->
<h1>Module <a href="type_List.html">List</a></h1>
<p>Paragraph without end tag
<p>Another &amp; one<br>
<pre><span id="VALlength"><span class="keyword">val</span> length</span> : <code class="type">'a list -&gt; int</code></pre>
<input type=checkbox checked>
<img src='x.png' alt="a &quot;b&quot;" />
</body>
</html>
"#;

    #[test]
    fn test_unmodified_roundtrip_is_byte_identical() {
        let doc = HtmlParser::new().unwrap().parse(PAGE).unwrap();
        assert_eq!(doc.to_html(), PAGE);
    }

    #[test]
    fn test_changed_start_tag_is_rendered_from_attributes() {
        let mut doc = HtmlParser::new().unwrap().parse("<pre class=verbatim>x</pre>").unwrap();
        let pre = doc.find_first(doc.root(), "pre").unwrap();
        doc.set_attr(pre, "id", "autoid_0000").unwrap();
        assert_eq!(
            doc.to_html(),
            r#"<pre class="verbatim" id="autoid_0000">x</pre>"#
        );
    }

    #[test]
    fn test_inserted_element_gets_end_tag() {
        let mut doc = HtmlParser::new().unwrap().parse("<div><h2>A</h2></div>").unwrap();
        let h2 = doc.find_first(doc.root(), "h2").unwrap();
        let marker = doc.create_element("a", &[("name", "n"), ("class", "dashAnchor")]);
        doc.insert_before(h2, marker).unwrap();
        assert_eq!(
            doc.to_html(),
            r#"<div><a name="n" class="dashAnchor"></a><h2>A</h2></div>"#
        );
    }

    #[test]
    fn test_removed_href_keeps_link_text() {
        let mut doc = HtmlParser::new()
            .unwrap()
            .parse(r#"<span><a href="Stdlib.Bool.html">Bool</a></span>"#)
            .unwrap();
        let a = doc.find_first(doc.root(), "a").unwrap();
        assert!(doc.remove_attr(a, "href"));
        assert_eq!(doc.to_html(), "<span><a>Bool</a></span>");
    }
}
