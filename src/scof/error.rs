//! Error types for the scof pipeline
//!
//! Tokenizer, parser and builder errors abort the file they occur in and carry
//! the 1-based line number of the offending statement. Validation problems are
//! collected into [`Violation`] lists instead, and archive-level failures are
//! grouped under [`ArchiveError`].

use crate::scof::validation::Violation;
use thiserror::Error;

/// Errors produced while turning scof text or archives into a document
#[derive(Debug, Error)]
pub enum ScofError {
    /// Leading whitespace is not a whole number of indentation units
    #[error("line {line}: malformed indentation ({reason})")]
    MalformedIndentation { line: usize, reason: String },

    /// A line is nested more than one level below its predecessor
    #[error("line {line}: unexpected indent to depth {depth} (at most {max} allowed here)")]
    UnexpectedIndent {
        line: usize,
        depth: usize,
        max: usize,
    },

    #[error("line {line}: unknown keyword '{keyword}'")]
    UnknownKeyword { line: usize, keyword: String },

    #[error("line {line}: '{keyword}' {message}")]
    ArityMismatch {
        line: usize,
        keyword: String,
        message: String,
    },

    /// A child-only construct appears at the top level
    #[error("line {line}: '{keyword}' must be nested under {expected}")]
    OrphanChild {
        line: usize,
        keyword: String,
        expected: String,
    },

    /// A construct appears under a parent that cannot own it
    #[error("line {line}: '{keyword}' cannot be nested under '{parent}'")]
    InvalidNesting {
        line: usize,
        keyword: String,
        parent: String,
    },

    #[error("line {line}: track T{id} is already declared on line {first_line}")]
    DuplicateTrackId {
        line: usize,
        id: u32,
        first_line: usize,
    },

    #[error("{} structural violation(s):\n{}", .0.len(), format_violations(.0))]
    StructuralViolation(Vec<Violation>),

    #[error("unrecognized archive entry '{0}'")]
    UnrecognizedEntry(String),

    /// An error inside one archive entry
    #[error("{entry}: {source}")]
    InEntry {
        entry: String,
        #[source]
        source: Box<ScofError>,
    },

    #[error(transparent)]
    ArchiveIo(#[from] ArchiveError),
}

impl ScofError {
    /// Attach the archive entry the error came from
    pub fn in_entry(self, entry: impl Into<String>) -> ScofError {
        ScofError::InEntry {
            entry: entry.into(),
            source: Box::new(self),
        }
    }

    /// Line the error points at, for errors tied to a single statement
    pub fn line(&self) -> Option<usize> {
        match self {
            ScofError::MalformedIndentation { line, .. }
            | ScofError::UnexpectedIndent { line, .. }
            | ScofError::UnknownKeyword { line, .. }
            | ScofError::ArityMismatch { line, .. }
            | ScofError::OrphanChild { line, .. }
            | ScofError::InvalidNesting { line, .. }
            | ScofError::DuplicateTrackId { line, .. } => Some(*line),
            ScofError::InEntry { source, .. } => source.line(),
            _ => None,
        }
    }
}

/// Fatal failures while reading or writing the zip container
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("required entry '{0}' is missing")]
    MissingEntry(String),

    #[error("archive holds {found} movement(s), at least {required} required")]
    TooFewMovements { found: usize, required: usize },

    #[error("entry '{0}' is not valid UTF-8 text")]
    Encoding(String),
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  {}", v))
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, ScofError>;
