//! Token definitions for scof lines
//!
//! The tokens are defined using the logos derive macro. A line is lexed on its
//! own: leading `Spaces`/`Tab` tokens make up its indentation, a `Comment` runs
//! to the end of the line, and everything else is either a bare `Word` or a
//! double-quoted `Quoted` string.
use logos::Logos;
use serde::Serialize;
use std::fmt;

/// All possible tokens on a scof line
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum Token {
    // Comments win over words thanks to longest match, and cannot start inside a quoted string
    #[regex(r"//[^\n]*")]
    Comment,

    #[regex(r" +")]
    Spaces,

    #[regex(r"\t+")]
    Tab,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Quoted,

    #[regex(r#"[^\s"]+"#)]
    Word,
}

impl Token {
    /// Check if this token carries statement content
    pub fn is_content(&self) -> bool {
        matches!(self, Token::Word | Token::Quoted)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Token::Comment => "comment",
            Token::Spaces => "spaces",
            Token::Tab => "tab",
            Token::Quoted => "quoted",
            Token::Word => "word",
        };
        write!(f, "<{}>", name)
    }
}

/// Tokenize a single line with location information
///
/// Unlexable input (an unterminated quote) is reported as `Err(span)`.
pub fn tokenize_line(line: &str) -> Vec<Result<(Token, std::ops::Range<usize>), std::ops::Range<usize>>> {
    let mut lexer = Token::lexer(line);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push(Ok((token, lexer.span()))),
            Err(()) => tokens.push(Err(lexer.span())),
        }
    }

    tokens
}
