//! Line records
//!
//! Turns the raw text of one file into a lazy sequence of [`LineRecord`]s.
//! Each line is lexed on its own, comments are dropped before anything else is
//! looked at, and blank or comment-only lines never produce a record.

use super::tokens::{tokenize_line, Token};
use crate::scof::error::ScofError;
use serde::Serialize;
use std::str::Lines;

/// Default number of spaces per indentation level
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Byte order mark some editors put at the start of UTF-8 files
const BOM: char = '\u{feff}';

/// Indentation width actually used for reading and writing
///
/// A width of zero cannot express nesting, so it reads and writes as one space.
/// Configuration rejects zero before it gets here.
pub fn indent_unit(indent_width: usize) -> usize {
    indent_width.max(1)
}

/// One non-blank statement line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineRecord<'a> {
    /// 1-based line number in the source
    pub line: usize,
    /// Indentation level (leading spaces / indent width)
    pub depth: usize,
    /// First word on the line
    pub keyword: &'a str,
    /// Everything after the keyword, comment stripped and trimmed
    pub arguments: &'a str,
    /// Content tokens after the keyword, with spans relative to `arguments`
    #[serde(skip)]
    pub argument_tokens: Vec<(Token, std::ops::Range<usize>)>,
}

impl<'a> LineRecord<'a> {
    /// Argument token texts, quoted strings included with their quotes
    pub fn argument_texts(&self) -> impl Iterator<Item = (Token, &'a str)> + '_ {
        let arguments = self.arguments;
        self.argument_tokens
            .iter()
            .map(move |(token, span)| (*token, &arguments[span.clone()]))
    }
}

/// Lazy tokenizer over the lines of one file
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    lines: std::iter::Enumerate<Lines<'a>>,
    indent_width: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_indent_width(source, DEFAULT_INDENT_WIDTH)
    }

    pub fn with_indent_width(source: &'a str, indent_width: usize) -> Self {
        let source = source.strip_prefix(BOM).unwrap_or(source);
        Tokenizer {
            lines: source.lines().enumerate(),
            indent_width: indent_unit(indent_width),
        }
    }

    pub fn indent_width(&self) -> usize {
        self.indent_width
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<LineRecord<'a>, ScofError>;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, text) in self.lines.by_ref() {
            match lex_line(index + 1, text, self.indent_width) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

/// Lex a single line into a record
///
/// Returns `Ok(None)` for blank and comment-only lines.
pub fn lex_line(line: usize, text: &str, indent_width: usize) -> Result<Option<LineRecord<'_>>, ScofError> {
    let indent_width = indent_unit(indent_width);
    let mut tokens = Vec::new();
    for result in tokenize_line(text) {
        match result {
            Ok((Token::Comment, _)) => break,
            Ok(pair) => tokens.push(pair),
            // A stray quote is plain text; argument grammars reject it where it matters
            Err(span) => tokens.push((Token::Word, span)),
        }
    }

    let content_start = match tokens.iter().position(|(t, _)| t.is_content()) {
        Some(i) => i,
        None => return Ok(None),
    };

    let width = match &tokens[..content_start] {
        [] => 0,
        [(Token::Spaces, span)] => span.len(),
        _ => {
            return Err(ScofError::MalformedIndentation {
                line,
                reason: "tabs are not allowed in indentation".to_string(),
            })
        }
    };
    if width % indent_width != 0 {
        return Err(ScofError::MalformedIndentation {
            line,
            reason: format!(
                "{} spaces is not a multiple of {}",
                width, indent_width
            ),
        });
    }

    let (keyword_token, keyword_span) = &tokens[content_start];
    if *keyword_token != Token::Word {
        return Err(ScofError::UnknownKeyword {
            line,
            keyword: text[keyword_span.clone()].to_string(),
        });
    }

    let rest = &tokens[content_start + 1..];
    let (arguments, argument_tokens) = match (
        rest.iter().find(|(t, _)| t.is_content()),
        rest.iter().rev().find(|(t, _)| t.is_content()),
    ) {
        (Some((_, first)), Some((_, last))) => {
            let offset = first.start;
            let argument_tokens = rest
                .iter()
                .filter(|(t, _)| t.is_content())
                .map(|(t, span)| (*t, span.start - offset..span.end - offset))
                .collect();
            (&text[offset..last.end], argument_tokens)
        }
        _ => ("", Vec::new()),
    };

    Ok(Some(LineRecord {
        line,
        depth: width / indent_width,
        keyword: &text[keyword_span.clone()],
        arguments,
        argument_tokens,
    }))
}
