//! Indexing of ocamldoc module pages.
//!
//! A module page gets a marker for the module itself, one Section entry per
//! `h2`/`h3`, and one entry per element whose `id` carries one of ocamldoc's
//! structured prefixes (`TYPEELT`, `TYPE`, `EXCEPTION`, `VAL`, `MODULE`).

use crate::anchor::insert_anchor;
use crate::dedup::{STDLIB_MODULE_NAME, SuppressReason, suppression_reason};
use crate::html::{Document, NodeId};
use crate::store::IndexStore;
use crate::{Category, IndexEntry, Result};
use tracing::{debug, warn};

/// Separator between a module name and its section titles in Section entries.
pub const SECTION_SEPARATOR: &str = " — ";

/// Prefix of the primary type's members in `TYPEELT` ids.
const PRIMARY_TYPE_PREFIX: &str = "t.";

const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// A page classified as a module, functor or module type.
#[derive(Debug, Clone, Copy)]
pub struct ModulePage<'a> {
    /// Module name from the heading.
    pub name: &'a str,
    /// `Module` or `Interface`.
    pub category: Category,
    /// The page's `h1`.
    pub heading: NodeId,
    /// Root-relative page path.
    pub path: &'a str,
}

/// What happened to a module page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleOutcome {
    /// Entries were recorded.
    Indexed,
    /// Only the module marker was inserted.
    Suppressed(SuppressReason),
}

/// Index a module page.
///
/// The module's own marker is inserted before the suppression check, so
/// suppressed pages still get it. `page_exists_for` tells whether a sibling
/// page documents the given module name.
pub fn index_module<F>(
    doc: &mut Document,
    store: &mut IndexStore,
    page: &ModulePage<'_>,
    page_exists_for: F,
) -> Result<ModuleOutcome>
where
    F: Fn(&str) -> bool,
{
    insert_anchor(doc, page.heading, page.category, page.name)?;

    if let Some(reason) = suppression_reason(page.name, page_exists_for) {
        debug!(module = page.name, path = page.path, reason = reason.as_str(), "module suppressed");
        return Ok(ModuleOutcome::Suppressed(reason));
    }

    store.insert_ignore(&IndexEntry::new(page.name, page.category, page.path))?;
    index_sections(doc, store, page)?;
    index_identifiers(doc, store, page)?;
    Ok(ModuleOutcome::Indexed)
}

/// Title of the most recent `h2`, carried through the heading walk.
#[derive(Debug, Default)]
pub struct HeadingContext {
    major: Option<String>,
}

/// Entry name and marker label for one section heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeading {
    /// Index entry name, e.g. `List — Iterators`.
    pub name: String,
    /// Label embedded in the anchor marker.
    pub label: String,
}

impl HeadingContext {
    /// Start a new major section.
    pub fn major(&mut self, module: &str, title: &str) -> SectionHeading {
        self.major = Some(title.to_string());
        SectionHeading {
            name: format!("{module}{SECTION_SEPARATOR}{title}"),
            label: title.to_string(),
        }
    }

    /// A minor section. `None` when no major section has been seen yet, in
    /// which case the caller should use [`HeadingContext::orphan_minor`].
    pub fn minor(&self, module: &str, title: &str) -> Option<SectionHeading> {
        let major = self.major.as_deref()?;
        Some(SectionHeading {
            name: format!("{module}{SECTION_SEPARATOR}{major}{SECTION_SEPARATOR}{title}"),
            label: format!("\t{title}"),
        })
    }

    /// A minor section without an enclosing major one: named directly under
    /// the module and not indented.
    pub fn orphan_minor(module: &str, title: &str) -> SectionHeading {
        SectionHeading {
            name: format!("{module}{SECTION_SEPARATOR}{title}"),
            label: title.to_string(),
        }
    }
}

fn index_sections(doc: &mut Document, store: &mut IndexStore, page: &ModulePage<'_>) -> Result<()> {
    let mut context = HeadingContext::default();

    for heading in doc.elements_named(&["h2", "h3"]) {
        let title = doc.stripped_strings(heading).join(" ");
        let section = if doc.tag_name(heading) == Some("h2") {
            context.major(page.name, &title)
        } else if let Some(section) = context.minor(page.name, &title) {
            section
        } else {
            warn!("minor section ({title}) not preceded by major in {}", page.path);
            HeadingContext::orphan_minor(page.name, &title)
        };

        let mut entry = IndexEntry::new(section.name, Category::Section, page.path);
        if let Some(id) = doc.attr(heading, "id") {
            entry = entry.with_fragment(id);
        }
        store.insert_ignore(&entry)?;
        insert_anchor(doc, heading, Category::Section, &section.label)?;
    }
    Ok(())
}

/// Meaning of a structured element id.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Identifier<'a> {
    TypeElement(&'a str),
    Type(&'a str),
    Exception(&'a str),
    Value(&'a str),
    Module,
}

impl<'a> Identifier<'a> {
    /// Prefixes are checked longest-first where they overlap (`TYPEELT` before `TYPE`).
    fn parse(id: &'a str) -> Option<Self> {
        if let Some(rest) = id.strip_prefix("TYPEELT") {
            Some(Self::TypeElement(rest))
        } else if let Some(rest) = id.strip_prefix("TYPE") {
            Some(Self::Type(rest))
        } else if let Some(rest) = id.strip_prefix("EXCEPTION") {
            Some(Self::Exception(rest))
        } else if let Some(rest) = id.strip_prefix("VAL") {
            Some(Self::Value(rest))
        } else if id.starts_with("MODULE") {
            Some(Self::Module)
        } else {
            None
        }
    }
}

fn index_identifiers(
    doc: &mut Document,
    store: &mut IndexStore,
    page: &ModulePage<'_>,
) -> Result<()> {
    // Snapshot; the walk below inserts siblings.
    let tagged: Vec<(NodeId, String)> = doc
        .descendants(doc.root())
        .filter_map(|node| doc.attr(node, "id").map(|id| (node, id.into_owned())))
        .collect();

    for (node, id) in tagged {
        let Some(identifier) = Identifier::parse(&id) else {
            continue;
        };
        let (category, member, label) = match identifier {
            Identifier::TypeElement(member) => {
                let category = type_element_category(page.name, member);
                let label = member.strip_prefix(PRIMARY_TYPE_PREFIX).unwrap_or(member);
                (category, type_element_entry_name(page.name, member), label)
            },
            Identifier::Type(member) => (Category::Type, member.to_string(), member),
            Identifier::Exception(member) => (Category::Exception, member.to_string(), member),
            Identifier::Value(member) => {
                let category = if enclosing_text_has_arrow(doc, node) {
                    Category::Function
                } else {
                    Category::Value
                };
                (category, member.to_string(), member)
            },
            Identifier::Module => {
                if page.name == STDLIB_MODULE_NAME {
                    unlink_submodule(doc, node);
                }
                continue;
            },
        };

        let name = format!("{}.{member}", page.name);
        store.insert_ignore(&IndexEntry::new(name, category, page.path).with_fragment(id.as_str()))?;
        let target = enclosing(doc, node);
        insert_anchor(doc, target, category, label)?;
    }
    Ok(())
}

/// Constructor or record field. The last dotted segment decides, except for
/// `Bool`, whose constructors are the lowercase `false` and `true`.
fn type_element_category(module: &str, member: &str) -> Category {
    if module == "Bool" && matches!(member, "t.false" | "t.true") {
        return Category::Constructor;
    }
    let starts_lowercase = member
        .rsplit('.')
        .next()
        .and_then(|segment| segment.chars().next())
        .is_some_and(char::is_lowercase);
    if starts_lowercase {
        Category::Field
    } else {
        Category::Constructor
    }
}

/// Dash trims a trailing `()` from `Unit.t.()` in its search list, so the unit
/// constructor gets a zero-width space between the parentheses.
fn type_element_entry_name(module: &str, member: &str) -> String {
    if module == "Unit" && member == "t.()" {
        format!("t.({ZERO_WIDTH_SPACE})")
    } else {
        member.to_string()
    }
}

fn enclosing_text_has_arrow(doc: &Document, node: NodeId) -> bool {
    doc.strings(enclosing(doc, node))
        .iter()
        .any(|text| text.contains("->"))
}

/// Parent element of a tagged node; the node itself when it sits at the top level.
fn enclosing(doc: &Document, node: NodeId) -> NodeId {
    match doc.node(node).parent {
        Some(parent) if parent != doc.root() => parent,
        _ => node,
    }
}

/// The `Stdlib` page links each submodule to its `Stdlib.Foo.html` page, which is
/// not indexed; the unprefixed `Foo.html` link next to it stays.
fn unlink_submodule(doc: &mut Document, node: NodeId) {
    if let Some(link) = doc.find_first(node, "a") {
        if doc.remove_attr(link, "href") {
            debug!("removed submodule link");
        }
    }
}
