//! Movement object model
//!
//! A movement owns its part tree (parts, sections, grand staffs, tracks) and a
//! flat sequence of measures. Tracks live wherever they are declared but are
//! addressed by their global numeric id.

use super::attributes::{EffectiveAttributes, MeasureAttributes};
use super::repeat::Repeat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric track id (`T3` → 3), unique within a movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u32);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// One staff line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub label: String,
}

impl Track {
    pub fn new(id: u32, label: impl Into<String>) -> Self {
        Track {
            id: TrackId(id),
            label: label.into(),
        }
    }
}

/// Two or more tracks bracketed as one staff pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrandStaff {
    pub tracks: Vec<Track>,
}

impl GrandStaff {
    pub fn new(tracks: Vec<Track>) -> Self {
        GrandStaff { tracks }
    }
}

/// Something a part can own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Staff {
    Track(Track),
    GrandStaff(GrandStaff),
    Section(Section),
}

/// A named instrumental part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    pub staves: Vec<Staff>,
}

impl Part {
    pub fn new(name: impl Into<String>) -> Self {
        Part {
            name: name.into(),
            staves: Vec::new(),
        }
    }

    pub fn with_track(mut self, track: Track) -> Self {
        self.staves.push(Staff::Track(track));
        self
    }

    pub fn with_grand_staff(mut self, grand_staff: GrandStaff) -> Self {
        self.staves.push(Staff::GrandStaff(grand_staff));
        self
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.staves.push(Staff::Section(section));
        self
    }
}

/// A group of parts forming one system
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: Option<String>,
    pub condensed: bool,
    pub parts: Vec<Part>,
}

impl Section {
    pub fn new(name: Option<String>) -> Self {
        Section {
            name,
            condensed: false,
            parts: Vec::new(),
        }
    }

    pub fn condensed(mut self) -> Self {
        self.condensed = true;
        self
    }

    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }
}

/// A top-level declaration of the part tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Group {
    Part(Part),
    Section(Section),
}

/// A timeline unit with sparse attribute overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    #[serde(flatten)]
    pub overrides: MeasureAttributes,
    /// Marks on this measure only, in written order
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub repeats: Vec<Repeat>,
}

impl Measure {
    pub fn new(overrides: MeasureAttributes) -> Self {
        Measure {
            overrides,
            repeats: Vec::new(),
        }
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeats.push(repeat);
        self
    }
}

/// One movement of a score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub groups: Vec<Group>,
    pub measures: Vec<Measure>,
}

impl Movement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_measure(mut self, measure: Measure) -> Self {
        self.measures.push(measure);
        self
    }

    /// Every track in declaration order, wherever it is nested
    pub fn tracks(&self) -> Vec<&Track> {
        let mut out = Vec::new();
        for group in &self.groups {
            match group {
                Group::Part(part) => collect_part_tracks(part, &mut out),
                Group::Section(section) => collect_section_tracks(section, &mut out),
            }
        }
        out
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks().into_iter().find(|t| t.id == id)
    }

    /// Attributes in force at measure `index`
    ///
    /// Each field comes from the nearest measure at or before `index` that
    /// overrides it, falling back to the baseline.
    pub fn effective_attributes(&self, index: usize) -> Option<EffectiveAttributes> {
        let upto = self.measures.get(..=index)?;
        let base = EffectiveAttributes::default();
        let mut nearest = upto.iter().rev().map(|m| &m.overrides);
        Some(EffectiveAttributes {
            key: nearest.clone().find_map(|o| o.key).unwrap_or(base.key),
            time: nearest.clone().find_map(|o| o.time).unwrap_or(base.time),
            tempo: nearest.clone().find_map(|o| o.tempo).unwrap_or(base.tempo),
            swing: nearest.clone().find_map(|o| o.swing).unwrap_or(base.swing),
            instruction: nearest.find_map(|o| o.instruction.clone()),
        })
    }

    /// Effective attributes of every measure, in order
    pub fn effective_measures(&self) -> impl Iterator<Item = EffectiveAttributes> + '_ {
        self.measures
            .iter()
            .scan(EffectiveAttributes::default(), |state, measure| {
                *state = measure.overrides.apply_to(state);
                Some(state.clone())
            })
    }
}

fn collect_part_tracks<'a>(part: &'a Part, out: &mut Vec<&'a Track>) {
    for staff in &part.staves {
        match staff {
            Staff::Track(track) => out.push(track),
            Staff::GrandStaff(grand) => out.extend(grand.tracks.iter()),
            Staff::Section(section) => collect_section_tracks(section, out),
        }
    }
}

fn collect_section_tracks<'a>(section: &'a Section, out: &mut Vec<&'a Track>) {
    for part in &section.parts {
        collect_part_tracks(part, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scof::model::attributes::{Accidental, Key, PitchName, TimeSignature};

    fn measure(tempo: Option<u16>, instruction: Option<&str>) -> Measure {
        Measure::new(MeasureAttributes {
            tempo,
            instruction: instruction.map(str::to_string),
            ..Default::default()
        })
    }

    #[test]
    fn test_tracks_in_declaration_order() {
        let movement = Movement::new()
            .with_group(Group::Part(
                Part::new("Piano")
                    .with_track(Track::new(0, "voice"))
                    .with_grand_staff(GrandStaff::new(vec![
                        Track::new(1, "piano"),
                        Track::new(2, "piano"),
                    ])),
            ))
            .with_group(Group::Section(
                Section::new(Some("Strings".into()))
                    .with_part(Part::new("Violin").with_track(Track::new(3, "violin"))),
            ));
        let ids: Vec<u32> = movement.tracks().iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(movement.track(TrackId(3)).map(|t| t.label.as_str()), Some("violin"));
        assert!(movement.track(TrackId(9)).is_none());
    }

    #[test]
    fn test_effective_attributes_inherit_per_field() {
        let movement = Movement::new()
            .with_measure(measure(Some(90), None))
            .with_measure(measure(None, Some("dolce")))
            .with_measure(Measure::new(MeasureAttributes {
                key: Some(Key::major(PitchName::F).with_accidental(Accidental::Sharp)),
                ..Default::default()
            }));

        let third = movement.effective_attributes(2).unwrap();
        assert_eq!(third.tempo, 90);
        assert_eq!(third.instruction.as_deref(), Some("dolce"));
        assert_eq!(third.key.to_string(), "F#");
        assert_eq!(third.time, TimeSignature::new(4, 4));
        assert!(movement.effective_attributes(3).is_none());
    }

    #[test]
    fn test_swing_carries_but_repeats_do_not() {
        let movement = Movement::new()
            .with_measure(
                Measure::new(MeasureAttributes {
                    swing: Some(66),
                    ..Default::default()
                })
                .with_repeat(Repeat::Open),
            )
            .with_measure(Measure::default());
        assert_eq!(movement.effective_attributes(1).unwrap().swing, 66);
        assert!(movement.measures[1].repeats.is_empty());
        assert!(movement.measures[1].overrides.is_empty());
    }

    #[test]
    fn test_effective_measures_agree_with_lookup() {
        let movement = Movement::new()
            .with_measure(Measure::default())
            .with_measure(measure(Some(160), Some("Aggressively")))
            .with_measure(Measure::default());
        let walked: Vec<_> = movement.effective_measures().collect();
        for (i, effective) in walked.iter().enumerate() {
            assert_eq!(Some(effective.clone()), movement.effective_attributes(i));
        }
        assert_eq!(walked[0], EffectiveAttributes::default());
    }
}
