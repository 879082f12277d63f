//! Lexer module for the scof format
//!
//! This module contains the tokenization logic for scof text entries,
//! including token definitions and the line record iterator.
//!
//! Indentation Handling
//!
//! Indentation is structure in scof: a statement indented one level below
//! another is its child. Lines are lexed independently with logos, and only the
//! width of the leading run of spaces is kept, as a depth. Turning depths into a
//! tree is left to the parser, which keeps this stage free of any nesting state
//! and lets a caller resume from any line.
//!
//! Comments start with `//` and run to the end of the line. They are dropped
//! before the keyword is extracted, so `T0 voice // Add voice track.` and
//! `T0 voice` produce the same record.

pub mod lines;
pub mod tokens;

pub use lines::{indent_unit, lex_line, LineRecord, Tokenizer, DEFAULT_INDENT_WIDTH};
pub use tokens::{tokenize_line, Token};

/// Tokenize a whole source into line records, stopping at the first error
pub fn lex(source: &str) -> Result<Vec<LineRecord<'_>>, crate::scof::error::ScofError> {
    Tokenizer::new(source).collect()
}

/// Raw tokens of every line (blank lines included), for inspection output
pub fn tokenize(source: &str) -> Vec<Vec<Token>> {
    source
        .lines()
        .map(|line| {
            tokenize_line(line)
                .into_iter()
                .filter_map(|r| r.ok().map(|(t, _)| t))
                .collect()
        })
        .collect()
}
