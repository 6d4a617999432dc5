//! Text patterns for OCaml declarations and manual headings.
//!
//! Identifier classes follow the lexical conventions chapter of the manual:
//! <https://ocaml.org/manual/lex.html#sss:lex:identifiers>. All patterns are
//! anchored, so `is_match`/`captures` behave as a full match.

use regex::Regex;
use std::sync::LazyLock;

/// Characters after the first one of any identifier.
pub const IDENTIFIER_TAIL: &str = r"[A-Za-z0-9_']*";
/// First character of any identifier.
pub const IDENTIFIER_HEAD: &str = r"[A-Za-z_]";
/// First character of a capitalized identifier (constructors, exceptions, modules).
pub const CAPITALIZED_HEAD: &str = r"[A-Z]";
/// First character of a lowercase identifier (types, values).
pub const LOWERCASE_HEAD: &str = r"[a-z_]";

/// `type [params] name [= rhs]`, with the rhs's first token and any `|` alternatives.
pub static TYPE_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    let type_variable = format!("'{IDENTIFIER_HEAD}{IDENTIFIER_TAIL}");
    let type_name = format!("{LOWERCASE_HEAD}{IDENTIFIER_TAIL}");
    compile(&format!(
        r"^type (?:(?:{tv}|\({tv}(?:, {tv})*\)) )?({type_name})(?: = (\S+(?: \| .+)?))?$",
        tv = type_variable,
    ))
});

/// `exception Name [of payload]`.
pub static EXCEPTION_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"^exception ({CAPITALIZED_HEAD}{IDENTIFIER_TAIL})(?: of .+)?$"
    ))
});

/// Library chapter heading, e.g. `Chapter 30 The unix library: Unix system calls`.
pub static LIBRARY_CHAPTER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^.+The ([^ ]+) library(?:: .+)?$"));

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("declaration patterns are valid")
}

/// A `type` declaration recognised in a preformatted block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    /// Type constructor name.
    pub name: String,
    /// First token of each right-hand-side alternative.
    pub constructors: Vec<String>,
}

/// What a collapsed preformatted block declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// A type, with its constructors if it is a variant.
    Type(TypeDeclaration),
    /// An exception, by name.
    Exception(String),
}

/// Match a block against the type grammar, then the exception grammar.
pub fn match_declaration(text: &str) -> Option<Declaration> {
    if let Some(caps) = TYPE_DECLARATION.captures(text) {
        let name = caps[1].to_string();
        let constructors = caps
            .get(2)
            .map(|rhs| {
                rhs.as_str()
                    .split('|')
                    .filter_map(|alternative| alternative.split_whitespace().next())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        return Some(Declaration::Type(TypeDeclaration { name, constructors }));
    }

    EXCEPTION_DECLARATION
        .captures(text)
        .map(|caps| Declaration::Exception(caps[1].to_string()))
}

/// Library name from a chapter heading.
pub fn library_name(heading: &str) -> Option<&str> {
    LIBRARY_CHAPTER
        .captures(heading)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn type_decl(name: &str, constructors: &[&str]) -> Option<Declaration> {
        Some(Declaration::Type(TypeDeclaration {
            name: name.to_string(),
            constructors: constructors.iter().map(|c| (*c).to_string()).collect(),
        }))
    }

    #[test]
    fn test_variant_with_type_parameter() {
        assert_eq!(
            match_declaration("type 'a t = A | B of int"),
            type_decl("t", &["A", "B"])
        );
    }

    #[test]
    fn test_exception_with_payload() {
        assert_eq!(
            match_declaration("exception Foo of string"),
            Some(Declaration::Exception("Foo".to_string()))
        );
        assert_eq!(
            match_declaration("exception Exit"),
            Some(Declaration::Exception("Exit".to_string()))
        );
    }

    #[test]
    fn test_abstract_and_multi_parameter_types() {
        assert_eq!(match_declaration("type file_descr"), type_decl("file_descr", &[]));
        assert_eq!(
            match_declaration("type ('a, 'b) either = Left | Right of 'b"),
            type_decl("either", &["Left", "Right"])
        );
    }

    #[test]
    fn test_first_alternative_must_be_a_single_token() {
        assert_eq!(match_declaration("type ('a, 'b) result = Ok of 'a | Error of 'b"), None);
    }

    #[test]
    fn test_alias_rhs_is_taken_as_single_alternative() {
        assert_eq!(match_declaration("type t = int"), type_decl("t", &["int"]));
    }

    #[test]
    fn test_records_and_other_blocks_do_not_match() {
        assert_eq!(match_declaration("type t = { mutable x : int }"), None);
        assert_eq!(match_declaration("val f : int -> int"), None);
        assert_eq!(match_declaration("type T = A"), None);
        assert_eq!(match_declaration("exception foo"), None);
        assert_eq!(match_declaration("  type t"), None);
    }

    #[test]
    fn test_library_chapter_headings() {
        assert_eq!(
            library_name("Chapter 30 The unix library: Unix system calls"),
            Some("unix")
        );
        assert_eq!(library_name("Chapter 29 The str library"), Some("str"));
        assert_eq!(library_name("The str library"), None);
        assert_eq!(library_name("Chapter 1 The core language"), None);
    }
}
