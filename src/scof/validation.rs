//! Structural validation
//!
//! Runs over a built model and collects every problem it finds instead of
//! stopping at the first one. Each [`Violation`] carries a path such as
//! `Movement/Intro > P Piano > G#1` so all of them can be reported together.
//!
//! The parser already rejects most malformed input; these checks cover what
//! the grammar cannot see (empty groups, out-of-range numbers) and models that
//! were built by hand rather than parsed.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::scof::error::ScofError;
use crate::scof::model::{
    Document, GrandStaff, Group, Meta, Movement, Part, Repeat, Section, Staff, Track, TrackId,
};

/// One structural problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Where the problem is, outermost first
    pub path: String,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum ViolationKind {
    /// A track id referenced from elsewhere is not declared
    UnresolvedTrack { id: TrackId },
    /// A track id is declared more than once
    DuplicateTrack { id: TrackId },
    EmptySection,
    /// A grand staff needs at least two tracks
    SparseGrandStaff { tracks: usize },
    ZeroTempo,
    ZeroBeats,
    /// Time signature unit that is not a power of two
    IrregularUnit { unit: u16 },
    /// Swing above 100 percent
    SwingOutOfRange { swing: u8 },
    /// Numbered endings count from 1
    ZeroEnding,
    /// Text the line format cannot write back unchanged
    Unrepresentable { field: &'static str, reason: String },
    /// Listed in the metadata but not present in the archive
    MissingMovement { name: String },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::UnresolvedTrack { id } => write!(f, "track {} is not declared", id),
            ViolationKind::DuplicateTrack { id } => write!(f, "track {} is declared more than once", id),
            ViolationKind::EmptySection => write!(f, "section has no parts"),
            ViolationKind::SparseGrandStaff { tracks } => {
                write!(f, "grand staff has {} track(s), needs at least 2", tracks)
            }
            ViolationKind::ZeroTempo => write!(f, "tempo must be greater than 0"),
            ViolationKind::ZeroBeats => write!(f, "time signature needs at least one beat"),
            ViolationKind::IrregularUnit { unit } => {
                write!(f, "time signature unit {} is not a power of two", unit)
            }
            ViolationKind::SwingOutOfRange { swing } => {
                write!(f, "swing {}% is above 100%", swing)
            }
            ViolationKind::ZeroEnding => write!(f, "ending number must be at least 1"),
            ViolationKind::Unrepresentable { field, reason } => write!(f, "{} {}", field, reason),
            ViolationKind::MissingMovement { name } => {
                write!(f, "movement '{}' is listed but not present", name)
            }
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

/// Check one movement
pub fn validate_movement(movement: &Movement) -> Vec<Violation> {
    let mut checker = Checker::default();
    checker.movement(movement);
    checker.violations
}

/// Check a whole document: the metadata, every movement and the metadata's
/// movement list
pub fn validate_document(document: &Document) -> Vec<Violation> {
    let mut checker = Checker::default();
    checker.scope("Meta".to_string(), |c| c.meta(&document.meta));
    for file in &document.movements {
        checker.scope(format!("Movement/{}", file.name), |c| {
            c.text("movement name", &file.name);
            if file.name.contains('/') || file.name.contains('\\') {
                c.push(ViolationKind::Unrepresentable {
                    field: "movement name",
                    reason: "contains a path separator".to_string(),
                });
            }
            c.movement(&file.movement);
        });
    }
    for name in &document.meta.movements {
        if document.movement(name).is_none() {
            checker.push(ViolationKind::MissingMovement { name: name.clone() });
        }
    }
    checker.violations
}

/// Check that track ids used outside the part tree are declared
///
/// `references` pairs each id with a description of where it was used.
pub fn check_track_references<'a, I>(movement: &Movement, references: I) -> Vec<Violation>
where
    I: IntoIterator<Item = (&'a str, TrackId)>,
{
    references
        .into_iter()
        .filter(|(_, id)| movement.track(*id).is_none())
        .map(|(location, id)| Violation {
            path: location.to_string(),
            kind: ViolationKind::UnresolvedTrack { id },
        })
        .collect()
}

/// Turn a violation list into a result
pub fn ensure_valid(violations: Vec<Violation>) -> Result<(), ScofError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ScofError::StructuralViolation(violations))
    }
}

#[derive(Default)]
struct Checker {
    path: Vec<String>,
    violations: Vec<Violation>,
    declared: HashMap<TrackId, usize>,
}

impl Checker {
    fn scope(&mut self, segment: String, f: impl FnOnce(&mut Self)) {
        self.path.push(segment);
        f(self);
        self.path.pop();
    }

    fn push(&mut self, kind: ViolationKind) {
        self.violations.push(Violation {
            path: self.path.join(" > "),
            kind,
        });
    }

    fn movement(&mut self, movement: &Movement) {
        self.declared.clear();
        for group in &movement.groups {
            match group {
                Group::Part(part) => self.part(part),
                Group::Section(section) => self.section(section),
            }
        }

        for (index, measure) in movement.measures.iter().enumerate() {
            let overrides = &measure.overrides;
            self.scope(format!("M#{}", index + 1), |c| {
                if overrides.tempo == Some(0) {
                    c.push(ViolationKind::ZeroTempo);
                }
                if let Some(swing) = overrides.swing.filter(|&swing| swing > 100) {
                    c.push(ViolationKind::SwingOutOfRange { swing });
                }
                if measure.repeats.contains(&Repeat::Ending(0)) {
                    c.push(ViolationKind::ZeroEnding);
                }
                if let Some(time) = overrides.time {
                    if time.beats == 0 {
                        c.push(ViolationKind::ZeroBeats);
                    }
                    if !time.unit.is_power_of_two() {
                        c.push(ViolationKind::IrregularUnit { unit: time.unit });
                    }
                }
            });
        }
    }

    fn part(&mut self, part: &Part) {
        self.scope(format!("P {}", part.name), |c| {
            c.text("part name", &part.name);
            let mut grand_staffs = 0;
            for staff in &part.staves {
                match staff {
                    Staff::Track(track) => c.track(track),
                    Staff::GrandStaff(grand) => {
                        grand_staffs += 1;
                        c.grand_staff(grand, grand_staffs);
                    }
                    Staff::Section(section) => c.section(section),
                }
            }
        });
    }

    fn section(&mut self, section: &Section) {
        let segment = match &section.name {
            Some(name) => format!("S {}", name),
            None => "S".to_string(),
        };
        self.scope(segment, |c| {
            if let Some(name) = &section.name {
                c.text("section name", name);
            }
            if section.parts.is_empty() {
                c.push(ViolationKind::EmptySection);
            }
            for part in &section.parts {
                c.part(part);
            }
        });
    }

    fn grand_staff(&mut self, grand: &GrandStaff, ordinal: usize) {
        self.scope(format!("G#{}", ordinal), |c| {
            if grand.tracks.len() < 2 {
                c.push(ViolationKind::SparseGrandStaff {
                    tracks: grand.tracks.len(),
                });
            }
            for track in &grand.tracks {
                c.track(track);
            }
        });
    }

    fn track(&mut self, track: &Track) {
        self.scope(track.id.to_string(), |c| {
            c.text("track label", &track.label);
            let count = c.declared.entry(track.id).or_insert(0);
            *count += 1;
            if *count == 2 {
                c.push(ViolationKind::DuplicateTrack { id: track.id });
            }
        });
    }

    fn meta(&mut self, meta: &Meta) {
        self.text("composer", &meta.composer);
        let optional = [
            ("subtitle", &meta.subtitle),
            ("lyricist", &meta.lyricist),
            ("translator", &meta.translator),
            ("performers", &meta.performers),
        ];
        for (field, value) in optional {
            if let Some(value) = value {
                self.text(field, value);
            }
        }
        for (index, arranger) in meta.arrangers.iter().enumerate() {
            self.scope(format!("arranger#{}", index + 1), |c| {
                c.text("arranger name", &arranger.name);
                if let Some(ensemble) = &arranger.ensemble {
                    c.text("arranger ensemble", ensemble);
                }
            });
        }
        for name in &meta.revised {
            self.text("revised", name);
        }
        for license in &meta.licenses {
            self.text("licenses", license);
        }
        for movement in &meta.movements {
            self.text("movement", movement);
        }
    }

    /// Free text has to survive a trip through the line format
    fn text(&mut self, field: &'static str, value: &str) {
        let reason = if value.is_empty() {
            Some("is empty")
        } else if value.contains('\n') || value.contains('\r') {
            Some("contains a line break")
        } else if starts_comment(value) {
            Some("contains '//', which starts a comment")
        } else if value.trim() != value {
            Some("has leading or trailing whitespace")
        } else {
            None
        };
        if let Some(reason) = reason {
            self.push(ViolationKind::Unrepresentable {
                field,
                reason: reason.to_string(),
            });
        }
    }
}

/// Whether `//` appears where the tokenizer would read it as a comment
///
/// A comment starts only at a token boundary, so `voice//x` stays one word.
fn starts_comment(value: &str) -> bool {
    value.match_indices("//").any(|(at, _)| {
        value[..at]
            .chars()
            .next_back()
            .map_or(true, |before| before.is_whitespace() || before == '"')
    })
}
