use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of documentation entity recorded in the search index.
///
/// The set mirrors the entry types Dash understands. Functors are recorded as
/// [`Category::Module`]; there is no separate variant for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Module or functor.
    Module,
    /// Module type.
    Interface,
    /// Library chapter of the manual.
    Library,
    /// Titled section of a module page.
    Section,
    /// Type definition.
    Type,
    /// Exception definition.
    Exception,
    /// Record field.
    Field,
    /// Variant constructor.
    Constructor,
    /// Value whose type is an arrow.
    Function,
    /// Any other value.
    Value,
}

impl Category {
    /// Canonical rendering stored in the `type` column and embedded in anchor markers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "Module",
            Self::Interface => "Interface",
            Self::Library => "Library",
            Self::Section => "Section",
            Self::Type => "Type",
            Self::Exception => "Exception",
            Self::Field => "Field",
            Self::Constructor => "Constructor",
            Self::Function => "Function",
            Self::Value => "Value",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row destined for the search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Display name, e.g. `List.map`.
    pub name: String,
    /// What kind of entity the entry names.
    pub category: Category,
    /// Page path relative to the manual root, `/`-separated.
    pub path: String,
    /// Element id on that page, if the entry points inside it.
    pub fragment: Option<String>,
}

impl IndexEntry {
    /// Entry pointing at the page itself.
    pub fn new(name: impl Into<String>, category: Category, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category,
            path: path.into(),
            fragment: None,
        }
    }

    /// Point the entry at an element id on its page.
    #[must_use]
    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    /// Value stored in the `path` column: `page#fragment`, or the bare page path.
    pub fn resolved_path(&self) -> String {
        match &self.fragment {
            Some(fragment) => format!("{}#{}", self.path, fragment),
            None => self.path.clone(),
        }
    }
}

/// A row read back from the search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredEntry {
    /// Display name.
    pub name: String,
    /// Canonical category rendering, as stored.
    pub kind: String,
    /// `page#fragment` or bare page path.
    pub path: String,
}
