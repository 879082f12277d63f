//! Parser module for the scof format
//!
//! Turns line records into an indexed [`ParseTree`] of [`Statement`]s.
//!
//! - `grammar` - keyword table, argument arity and nesting rules
//! - `measure` - the `M` argument grammar
//! - `tree` - the arena tree and the stack-based builder

pub mod grammar;
pub mod measure;
pub mod tree;

pub use grammar::{Keyword, Statement};
pub use measure::{parse_measure_arguments, quote, unquote, Arg};
pub use tree::{Node, NodeId, ParseTree};

use crate::scof::error::ScofError;
use crate::scof::lexer::{Tokenizer, DEFAULT_INDENT_WIDTH};

/// Parse movement text into a tree using the default indentation width
pub fn parse(source: &str) -> Result<ParseTree, ScofError> {
    parse_with_indent(source, DEFAULT_INDENT_WIDTH)
}

pub fn parse_with_indent(source: &str, indent_width: usize) -> Result<ParseTree, ScofError> {
    ParseTree::from_records(Tokenizer::with_indent_width(source, indent_width))
}
