//! Measure argument grammar
//!
//! `M [key] [time] [tempo] [swing] ["instruction"] [repeat...]`: every argument
//! is optional but they must come in this order. Repeat marks may be given
//! several times, everything else at most once. The argument list is small
//! enough to be a flat chumsky sequence over already-lexed arguments.

use chumsky::error::SimpleReason;
use chumsky::prelude::*;
use std::fmt;

use crate::scof::model::attributes::{
    is_swing, is_tempo, parse_swing, Key, MeasureAttributes, TimeSignature,
};
use crate::scof::model::{Measure, Repeat};

/// One lexed argument of a statement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arg {
    Word(String),
    /// Quoted string, already unescaped
    Quoted(String),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Word(w) => write!(f, "{}", w),
            Arg::Quoted(q) => write!(f, "{}", quote(q)),
        }
    }
}

/// Quote a string so that it lexes back as a single quoted argument
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Strip the quotes of a lexed quoted string and resolve its escapes
pub fn unquote(quoted: &str) -> String {
    let inner = quoted
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(quoted);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn word<F>(shape: F) -> impl Parser<Arg, String, Error = Simple<Arg>> + Clone
where
    F: Fn(&str) -> bool + Clone,
{
    filter_map(move |span, arg: Arg| match arg {
        Arg::Word(w) if shape(&w) => Ok(w),
        other => Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
    })
}

fn measure_arguments() -> impl Parser<Arg, Measure, Error = Simple<Arg>> {
    let key = word(Key::matches).try_map(|w, span| w.parse::<Key>().map_err(|e| Simple::custom(span, e)));
    let time = word(TimeSignature::matches)
        .try_map(|w, span| w.parse::<TimeSignature>().map_err(|e| Simple::custom(span, e)));
    let tempo = word(is_tempo).try_map(|w, span| {
        w.parse::<u16>()
            .map_err(|e| Simple::custom(span, format!("tempo '{}': {}", w, e)))
    });
    let swing = word(is_swing).try_map(|w, span| parse_swing(&w).map_err(|e| Simple::custom(span, e)));
    let repeat = word(Repeat::matches).try_map(|w, span| w.parse::<Repeat>().map_err(|e| Simple::custom(span, e)));
    let instruction = filter_map(|span, arg: Arg| match arg {
        Arg::Quoted(text) => Ok(text),
        other => Err(Simple::expected_input_found(span, Vec::new(), Some(other))),
    });

    key.or_not()
        .then(time.or_not())
        .then(tempo.or_not())
        .then(swing.or_not())
        .then(instruction.or_not())
        .then(repeat.repeated())
        .then_ignore(end())
        .map(|(((((key, time), tempo), swing), instruction), repeats)| Measure {
            overrides: MeasureAttributes {
                key,
                time,
                tempo,
                swing,
                instruction,
            },
            repeats,
        })
}

/// Parse the arguments of an `M` statement
///
/// On failure returns a message describing the first offending argument.
pub fn parse_measure_arguments(args: Vec<Arg>) -> Result<Measure, String> {
    measure_arguments().parse(args).map_err(|errors| {
        match errors.into_iter().next() {
            Some(error) => match error.reason() {
                SimpleReason::Custom(message) => message.clone(),
                _ => match error.found() {
                    Some(arg) => format!(
                        "got unexpected argument '{}' (expected key, time signature, tempo, swing and a quoted instruction, each at most once and in that order, then repeat marks)",
                        arg
                    ),
                    None => "has incomplete arguments".to_string(),
                },
            },
            None => "has invalid arguments".to_string(),
        }
    })
}
