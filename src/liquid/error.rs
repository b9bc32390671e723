//! Liquid error types.
//!
//! Scan, structure and filter errors abort the whole render. Paths that do
//! not resolve are not errors at all: they render as empty strings and
//! branch as false.

use super::fence::Location;

/// Label used in messages when the caller supplied no origin.
const UNKNOWN_ORIGIN: &str = "<input>";

/// Errors that abort a render.
#[derive(thiserror::Error, Debug)]
pub enum LiquidError {
    #[error("{origin}:{location}: unterminated `{opener}` (no matching `{closer}`) near `{excerpt}`")]
    Scan {
        origin: String,
        location: Location,
        opener: &'static str,
        closer: &'static str,
        excerpt: String,
    },

    #[error("{origin}:{location}: {problem}: `{tag}`")]
    Structure {
        origin: String,
        location: Location,
        tag: String,
        problem: StructureProblem,
    },

    #[error("{origin}:{location}: unknown filter `{name}` in `{tag}` (available: {})", .available.join(", "))]
    UnknownFilter {
        origin: String,
        location: Location,
        name: String,
        tag: String,
        available: Vec<String>,
    },
}

impl LiquidError {
    /// Where in the document the error was detected.
    pub fn location(&self) -> Location {
        match self {
            LiquidError::Scan { location, .. }
            | LiquidError::Structure { location, .. }
            | LiquidError::UnknownFilter { location, .. } => *location,
        }
    }

    /// The document identifier supplied by the caller.
    pub fn origin(&self) -> &str {
        match self {
            LiquidError::Scan { origin, .. }
            | LiquidError::Structure { origin, .. }
            | LiquidError::UnknownFilter { origin, .. } => origin,
        }
    }
}

/// What is wrong with the block structure of a document.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureProblem {
    #[error("`endfor` without an open `for`")]
    UnmatchedEndFor,

    #[error("`endif` without an open `if`")]
    UnmatchedEndIf,

    #[error("`else` without an open `if`")]
    UnmatchedElse,

    #[error("second `else` in the same `if`")]
    DuplicateElse,

    #[error("`for` is never closed by `endfor`")]
    UnclosedFor,

    #[error("`if` is never closed by `endif`")]
    UnclosedIf,

    #[error("malformed `{keyword}` tag, expected `{expected}`")]
    Malformed {
        keyword: &'static str,
        expected: &'static str,
    },
}

/// Normalize a caller-supplied origin for use in messages.
pub(crate) fn origin_label(origin: &str) -> String {
    if origin.is_empty() {
        UNKNOWN_ORIGIN.to_string()
    } else {
        origin.to_string()
    }
}
