//! Main module for scof library functionality
//!
//! The pipeline runs tokenize → parse → build → validate, per movement file,
//! and the archive layer runs it for every movement entry of a score.

pub mod archive;
pub mod building;
pub mod config;
pub mod error;
pub mod formats;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod processor;
pub mod validation;

use crate::scof::error::ScofError;
use crate::scof::lexer::DEFAULT_INDENT_WIDTH;
use crate::scof::model::Movement;

/// Parse and build one movement file
pub fn parse_movement(source: &str) -> Result<Movement, ScofError> {
    parse_movement_with_indent(source, DEFAULT_INDENT_WIDTH)
}

pub fn parse_movement_with_indent(source: &str, indent_width: usize) -> Result<Movement, ScofError> {
    let tree = parser::parse_with_indent(source, indent_width)?;
    building::build_movement(&tree)
}

/// Parse, build and validate one movement file
pub fn load_movement(source: &str, indent_width: usize) -> Result<Movement, ScofError> {
    let movement = parse_movement_with_indent(source, indent_width)?;
    validation::ensure_valid(validation::validate_movement(&movement))?;
    Ok(movement)
}

/// Write one movement file with the default indentation
pub fn serialize_movement(movement: &Movement) -> String {
    formats::serialize_movement(movement, DEFAULT_INDENT_WIDTH)
}
