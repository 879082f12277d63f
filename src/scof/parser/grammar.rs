//! Line grammar
//!
//! Interprets a [`LineRecord`]'s keyword and arguments as a [`Statement`], and
//! knows which statements may own which.
//!
//! | Keyword | Statement | Arguments | Parents |
//! |---|---|---|---|
//! | `P` | part | name (free text) | top level, section |
//! | `S` | section | optional name | top level, part |
//! | `C` | condensed mark | none | section |
//! | `G` | grand staff | none | part |
//! | `T<n>` | track n | label (free text) | part, grand staff |
//! | `M` | measure | `[key] [time] [tempo] [swing] ["instruction"] [repeat...]` | top level |

use serde::Serialize;
use std::fmt;

use super::measure::{parse_measure_arguments, unquote, Arg};
use crate::scof::error::ScofError;
use crate::scof::lexer::{LineRecord, Token};
use crate::scof::model::Measure;

/// Statement kinds, without their arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    Part,
    Section,
    Condensed,
    GrandStaff,
    Track,
    Measure,
}

impl Keyword {
    /// Classify a keyword word; `T<n>` yields the track number text
    fn classify(word: &str) -> Option<(Keyword, Option<&str>)> {
        match word {
            "P" => Some((Keyword::Part, None)),
            "S" => Some((Keyword::Section, None)),
            "C" => Some((Keyword::Condensed, None)),
            "G" => Some((Keyword::GrandStaff, None)),
            "M" => Some((Keyword::Measure, None)),
            _ => {
                let digits = word.strip_prefix('T')?;
                if digits.chars().all(|c| c.is_ascii_digit()) {
                    Some((Keyword::Track, Some(digits)))
                } else {
                    None
                }
            }
        }
    }

    /// Whether a statement of this kind may appear directly under `parent`
    /// (`None` is the top level of a movement)
    pub fn allowed_under(self, parent: Option<Keyword>) -> bool {
        match (self, parent) {
            (Keyword::Part, None | Some(Keyword::Section)) => true,
            (Keyword::Section, None | Some(Keyword::Part)) => true,
            (Keyword::Condensed, Some(Keyword::Section)) => true,
            (Keyword::GrandStaff, Some(Keyword::Part)) => true,
            (Keyword::Track, Some(Keyword::Part | Keyword::GrandStaff)) => true,
            (Keyword::Measure, None) => true,
            _ => false,
        }
    }

    /// Child-only statements cannot appear at the top level
    pub fn is_child_only(self) -> bool {
        !self.allowed_under(None)
    }

    /// Human readable list of valid parents, for error messages
    pub fn expected_parents(self) -> &'static str {
        match self {
            Keyword::Part => "a section",
            Keyword::Section => "a part",
            Keyword::Condensed => "a section",
            Keyword::GrandStaff => "a part",
            Keyword::Track => "a part or grand staff",
            Keyword::Measure => "nothing",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Keyword::Part => "P",
            Keyword::Section => "S",
            Keyword::Condensed => "C",
            Keyword::GrandStaff => "G",
            Keyword::Track => "T",
            Keyword::Measure => "M",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An interpreted line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "statement", rename_all = "snake_case")]
pub enum Statement {
    Part { name: String },
    Section { name: Option<String> },
    Condensed,
    GrandStaff,
    Track { id: u32, label: String },
    Measure(Measure),
}

impl Statement {
    pub fn keyword(&self) -> Keyword {
        match self {
            Statement::Part { .. } => Keyword::Part,
            Statement::Section { .. } => Keyword::Section,
            Statement::Condensed => Keyword::Condensed,
            Statement::GrandStaff => Keyword::GrandStaff,
            Statement::Track { .. } => Keyword::Track,
            Statement::Measure(_) => Keyword::Measure,
        }
    }

    /// Interpret a line record against the grammar table
    pub fn interpret(record: &LineRecord<'_>) -> Result<Statement, ScofError> {
        let (keyword, track_digits) =
            Keyword::classify(record.keyword).ok_or_else(|| ScofError::UnknownKeyword {
                line: record.line,
                keyword: record.keyword.to_string(),
            })?;

        let arity = |message: String| ScofError::ArityMismatch {
            line: record.line,
            keyword: record.keyword.to_string(),
            message,
        };
        let free_text = || {
            if record.arguments.is_empty() {
                Err(arity("requires a name".to_string()))
            } else {
                Ok(record.arguments.to_string())
            }
        };
        let no_arguments = || {
            if record.arguments.is_empty() {
                Ok(())
            } else {
                Err(arity(format!(
                    "takes no arguments, got '{}'",
                    record.arguments
                )))
            }
        };

        match keyword {
            Keyword::Part => Ok(Statement::Part { name: free_text()? }),
            Keyword::Section => Ok(Statement::Section {
                name: (!record.arguments.is_empty()).then(|| record.arguments.to_string()),
            }),
            Keyword::Condensed => no_arguments().map(|_| Statement::Condensed),
            Keyword::GrandStaff => no_arguments().map(|_| Statement::GrandStaff),
            Keyword::Track => {
                let digits = track_digits.unwrap_or("");
                if digits.is_empty() {
                    return Err(arity("requires a track number, as in T0".to_string()));
                }
                let id = digits
                    .parse::<u32>()
                    .map_err(|e| arity(format!("has an invalid track number: {}", e)))?;
                if record.arguments.is_empty() {
                    return Err(arity("requires an instrument or voice label".to_string()));
                }
                Ok(Statement::Track {
                    id,
                    label: record.arguments.to_string(),
                })
            }
            Keyword::Measure => {
                let args = record
                    .argument_texts()
                    .map(|(token, text)| match token {
                        Token::Quoted => Arg::Quoted(unquote(text)),
                        _ => Arg::Word(text.to_string()),
                    })
                    .collect();
                parse_measure_arguments(args)
                    .map(Statement::Measure)
                    .map_err(&arity)
            }
        }
    }
}
