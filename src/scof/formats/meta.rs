//! Metadata entry text
//!
//! The metadata entry uses the same line conventions as movements (indentation,
//! `//` comments) with `key: value` records:
//!
//! ```text
//! composer: Johann Pachelbel
//! subtitle: for three violins and continuo
//! arranger:
//!     name: Someone
//!     ensemble: Brass Quintet
//! licenses: CC0
//! movement: Canon
//! movement: Gigue
//! ```
//!
//! List keys (`arranger`, `revised`, `licenses`, `movement`) repeat once per
//! item. Every other key may appear at most once.

use crate::scof::error::ScofError;
use crate::scof::lexer::{indent_unit, LineRecord, Tokenizer};
use crate::scof::model::{Arranger, Meta};

/// Parse a metadata entry
pub fn parse_meta(source: &str, indent_width: usize) -> Result<Meta, ScofError> {
    let mut meta = Meta::default();
    let mut seen: Vec<&str> = Vec::new();
    // Index into meta.arrangers of the record currently open, with its line
    let mut open_arranger: Option<(usize, usize)> = None;

    for record in Tokenizer::with_indent_width(source, indent_width) {
        let record = record?;
        let key = meta_key(&record)?;

        if record.depth > 0 {
            let (index, _) = match open_arranger {
                Some(open) if record.depth == 1 => open,
                Some(_) => {
                    return Err(ScofError::UnexpectedIndent {
                        line: record.line,
                        depth: record.depth,
                        max: 1,
                    })
                }
                None => {
                    return Err(ScofError::UnexpectedIndent {
                        line: record.line,
                        depth: record.depth,
                        max: 0,
                    })
                }
            };
            let arranger = &mut meta.arrangers[index];
            match key {
                "name" => arranger.name = required_value(&record)?,
                "ensemble" => arranger.ensemble = Some(required_value(&record)?),
                _ => {
                    return Err(ScofError::InvalidNesting {
                        line: record.line,
                        keyword: record.keyword.to_string(),
                        parent: "arranger:".to_string(),
                    })
                }
            }
            continue;
        }

        close_arranger(&meta, open_arranger.take())?;

        let repeatable = matches!(key, "arranger" | "revised" | "licenses" | "movement");
        if !repeatable {
            if seen.contains(&key) {
                return Err(arity(&record, "is given more than once"));
            }
            seen.push(key);
        }

        match key {
            "composer" => meta.composer = required_value(&record)?,
            "subtitle" => meta.subtitle = Some(required_value(&record)?),
            "number" => meta.number = Some(number_value(&record)?),
            "lyricist" => meta.lyricist = Some(required_value(&record)?),
            "translator" => meta.translator = Some(required_value(&record)?),
            "performers" => meta.performers = Some(required_value(&record)?),
            "grade" => meta.grade = Some(number_value(&record)?),
            "revised" => meta.revised.push(required_value(&record)?),
            "licenses" => meta.licenses.push(required_value(&record)?),
            "movement" => meta.movements.push(required_value(&record)?),
            "arranger" => {
                if !record.arguments.is_empty() {
                    return Err(arity(&record, "takes its name and ensemble on indented lines"));
                }
                meta.arrangers.push(Arranger {
                    name: String::new(),
                    ensemble: None,
                });
                open_arranger = Some((meta.arrangers.len() - 1, record.line));
            }
            _ => {
                return Err(ScofError::UnknownKeyword {
                    line: record.line,
                    keyword: record.keyword.to_string(),
                })
            }
        }
    }
    close_arranger(&meta, open_arranger)?;

    Ok(meta)
}

/// Write metadata in the entry text form
///
/// Absent optional values are left out, so parsing the output gives back an
/// equal [`Meta`].
pub fn serialize_meta(meta: &Meta, indent_width: usize) -> String {
    let indent = " ".repeat(indent_unit(indent_width));
    let mut out = String::new();

    push_line(&mut out, "", "composer", &meta.composer);
    let optional = [
        ("subtitle", meta.subtitle.clone()),
        ("number", meta.number.map(|n| n.to_string())),
        ("lyricist", meta.lyricist.clone()),
        ("translator", meta.translator.clone()),
        ("performers", meta.performers.clone()),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            push_line(&mut out, "", key, &value);
        }
    }
    for arranger in &meta.arrangers {
        out.push_str("arranger:\n");
        push_line(&mut out, &indent, "name", &arranger.name);
        if let Some(ensemble) = &arranger.ensemble {
            push_line(&mut out, &indent, "ensemble", ensemble);
        }
    }
    for name in &meta.revised {
        push_line(&mut out, "", "revised", name);
    }
    for license in &meta.licenses {
        push_line(&mut out, "", "licenses", license);
    }
    if let Some(grade) = meta.grade {
        push_line(&mut out, "", "grade", &grade.to_string());
    }
    for movement in &meta.movements {
        push_line(&mut out, "", "movement", movement);
    }
    out
}

fn push_line(out: &mut String, indent: &str, key: &str, value: &str) {
    out.push_str(indent);
    out.push_str(key);
    out.push_str(": ");
    out.push_str(value);
    out.push('\n');
}

fn meta_key<'a>(record: &LineRecord<'a>) -> Result<&'a str, ScofError> {
    record
        .keyword
        .strip_suffix(':')
        .filter(|key| !key.is_empty())
        .ok_or_else(|| ScofError::UnknownKeyword {
            line: record.line,
            keyword: record.keyword.to_string(),
        })
}

fn arity(record: &LineRecord<'_>, message: &str) -> ScofError {
    ScofError::ArityMismatch {
        line: record.line,
        keyword: record.keyword.to_string(),
        message: message.to_string(),
    }
}

fn required_value(record: &LineRecord<'_>) -> Result<String, ScofError> {
    if record.arguments.is_empty() {
        Err(arity(record, "requires a value"))
    } else {
        Ok(record.arguments.to_string())
    }
}

fn number_value<N: std::str::FromStr>(record: &LineRecord<'_>) -> Result<N, ScofError>
where
    N::Err: std::fmt::Display,
{
    record
        .arguments
        .parse::<N>()
        .map_err(|e| arity(record, &format!("expects a number, got '{}': {}", record.arguments, e)))
}

fn close_arranger(meta: &Meta, open: Option<(usize, usize)>) -> Result<(), ScofError> {
    match open {
        Some((index, line)) if meta.arrangers[index].name.is_empty() => {
            Err(ScofError::ArityMismatch {
                line,
                keyword: "arranger:".to_string(),
                message: "requires an indented 'name:'".to_string(),
            })
        }
        _ => Ok(()),
    }
}
