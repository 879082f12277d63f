//! Movement text serializer
//!
//! Writes a [`Movement`] back in the line grammar. The part tree comes first,
//! in declaration order, followed by the measures. Parsing the output of a
//! model that passes validation yields an equal model.

use crate::scof::lexer::indent_unit;
use crate::scof::model::{Group, Measure, Movement, Part, Section, Staff, Track};
use crate::scof::parser::quote;

/// Serialize a movement with the given indentation width
pub fn serialize_movement(movement: &Movement, indent_width: usize) -> String {
    let mut writer = TextWriter {
        out: String::new(),
        indent: " ".repeat(indent_unit(indent_width)),
    };
    for group in &movement.groups {
        match group {
            Group::Part(part) => writer.part(part, 0),
            Group::Section(section) => writer.section(section, 0),
        }
    }
    for measure in &movement.measures {
        writer.line(0, &measure_line(measure));
    }
    writer.out
}

/// The `M` statement for a measure
pub fn measure_line(measure: &Measure) -> String {
    let overrides = &measure.overrides;
    let mut line = String::from("M");
    if let Some(key) = overrides.key {
        line.push(' ');
        line.push_str(&key.to_string());
    }
    if let Some(time) = overrides.time {
        line.push(' ');
        line.push_str(&time.to_string());
    }
    if let Some(tempo) = overrides.tempo {
        line.push(' ');
        line.push_str(&tempo.to_string());
    }
    if let Some(swing) = overrides.swing {
        line.push(' ');
        line.push_str(&format!("{}%", swing));
    }
    if let Some(instruction) = &overrides.instruction {
        line.push(' ');
        line.push_str(&quote(instruction));
    }
    for repeat in &measure.repeats {
        line.push(' ');
        line.push_str(&repeat.to_string());
    }
    line
}

struct TextWriter {
    out: String,
    indent: String,
}

impl TextWriter {
    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str(&self.indent);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn part(&mut self, part: &Part, depth: usize) {
        self.line(depth, &format!("P {}", part.name));
        for staff in &part.staves {
            match staff {
                Staff::Track(track) => self.track(track, depth + 1),
                Staff::GrandStaff(grand) => {
                    self.line(depth + 1, "G");
                    for track in &grand.tracks {
                        self.track(track, depth + 2);
                    }
                }
                Staff::Section(section) => self.section(section, depth + 1),
            }
        }
    }

    fn section(&mut self, section: &Section, depth: usize) {
        match &section.name {
            Some(name) => self.line(depth, &format!("S {}", name)),
            None => self.line(depth, "S"),
        }
        if section.condensed {
            self.line(depth + 1, "C");
        }
        for part in &section.parts {
            self.part(part, depth + 1);
        }
    }

    fn track(&mut self, track: &Track, depth: usize) {
        self.line(depth, &format!("{} {}", track.id, track.label));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scof::model::{GrandStaff, Key, MeasureAttributes, PitchName, Repeat, TimeSignature};

    #[test]
    fn test_piano_movement() {
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
                    .condensed()
                    .with_part(Part::new("Violin").with_track(Track::new(3, "violin"))),
            ))
            .with_measure(Measure::default())
            .with_measure(Measure::new(MeasureAttributes {
                key: Some(Key::major(PitchName::E).minor()),
                time: Some(TimeSignature::new(6, 8)),
                tempo: Some(72),
                swing: Some(66),
                instruction: Some("with \"feeling\"".into()),
            }))
            .with_measure(Measure::default().with_repeat(Repeat::Close).with_repeat(Repeat::Ending(1)));

        insta::assert_snapshot!(serialize_movement(&movement, 4), @r###"
        P Piano
            T0 voice
            G
                T1 piano
                T2 piano
        S Strings
            C
            P Violin
                T3 violin
        M
        M Em 6/8 72 66% "with \"feeling\""
        M :|| 1.
        "###);
    }

    #[test]
    fn test_indent_width() {
        let movement =
            Movement::new().with_group(Group::Part(Part::new("Flute").with_track(Track::new(0, "flute"))));
        assert_eq!(serialize_movement(&movement, 2), "P Flute\n  T0 flute\n");
    }

    #[test]
    fn test_zero_indent_width_still_nests() {
        let movement =
            Movement::new().with_group(Group::Part(Part::new("Piano").with_track(Track::new(0, "voice"))));
        let text = serialize_movement(&movement, 0);
        assert_eq!(text, "P Piano\n T0 voice\n");
        let reparsed = crate::scof::parse_movement_with_indent(&text, 0).unwrap();
        assert_eq!(reparsed, movement);
    }

    #[test]
    fn test_unnamed_section() {
        let movement = Movement::new().with_group(Group::Section(Section::new(None)));
        assert_eq!(serialize_movement(&movement, 4), "S\n");
    }
}
