//! Error types and handling for docset-core operations.
//!
//! Every fallible operation in this crate returns [`Result<T>`]. Errors are
//! grouped into a small number of categories so that callers (the CLI) can
//! log them with a stable `category` field.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: reading pages, writing annotated pages, removing the old index
//! - **Parse Errors**: pages that cannot be decoded or parsed into a document tree
//! - **Index Errors**: SQLite failures while creating or writing the search index
//! - **Configuration Errors**: malformed configuration files
//! - **Pattern Errors**: invalid exclusion globs
//!
//! None of these are retried: every step of the pipeline is local and
//! deterministic, so a failure means the input or the filesystem is in a state
//! the run cannot work with.

use thiserror::Error;

/// The main error type for docset-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers reading input pages, writing rewritten pages, creating output
    /// directories and deleting a stale index file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A page could not be turned into a document tree.
    ///
    /// ## Common Causes
    ///
    /// - The page is not valid UTF-8
    /// - The HTML grammar could not be loaded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Search index operation failed.
    ///
    /// Raised when the SQLite database cannot be created, its schema cannot be
    /// applied, or a write fails for a reason other than a uniqueness conflict.
    #[error("Index error: {0}")]
    Index(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An exclusion glob is not a valid pattern.
    #[error("Invalid pattern '{pattern}': {reason}")]
    Pattern {
        /// Pattern as supplied by the user.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A document-tree operation was asked to do something structurally impossible,
    /// such as inserting a sibling before the root node.
    #[error("Document error: {0}")]
    Document(String),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Index(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("Failed to parse config: {err}"))
    }
}

impl Error {
    /// Get the error category as a string identifier.
    ///
    /// Used as a structured logging field by the CLI:
    ///
    /// ```rust
    /// use docset_core::Error;
    ///
    /// let err = Error::Index("disk I/O error".to_string());
    /// assert_eq!(err.category(), "index");
    /// ```
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Parse(_) => "parse",
            Self::Index(_) => "index",
            Self::Config(_) => "config",
            Self::Pattern { .. } => "pattern",
            Self::Document(_) => "document",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display_formatting() {
        let cases = vec![
            (Error::Parse("not utf-8".to_string()), "Parse error: not utf-8"),
            (Error::Index("locked".to_string()), "Index error: locked"),
            (
                Error::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                Error::Document("root has no parent".to_string()),
                "Document error: root has no parent",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_pattern_error_names_the_pattern() {
        let err = Error::Pattern {
            pattern: "[".to_string(),
            reason: "invalid range pattern".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'['"));
        assert!(msg.contains("invalid range pattern"));
        assert_eq!(err.category(), "pattern");
    }

    #[test]
    fn test_io_conversion() {
        let err: Error = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.category(), "io");
    }

    #[test]
    fn test_sqlite_errors_map_to_index() {
        let err: Error = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, Error::Index(_)));
    }

    #[test]
    fn test_toml_errors_map_to_config() {
        let parse: std::result::Result<toml::Value, _> = toml::from_str("not = [valid");
        let err: Error = parse.unwrap_err().into();
        assert_eq!(err.category(), "config");
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
