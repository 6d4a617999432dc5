//! HTML document model.
//!
//! Pages are parsed with tree-sitter into an arena tree ([`Document`]) that the
//! indexers walk and annotate, then serialized back only when something changed.

mod document;
mod parser;
mod serialize;

pub use document::{Attribute, Descendants, Document, ElementData, Node, NodeData, NodeId};
pub use parser::HtmlParser;
