//! Property-based round trip: serialize a valid movement, parse it back
//!
//! Generated models only use text the line format can represent, and track
//! ids are renumbered so they are unique within each movement.

use proptest::prelude::*;
use scof::scof::formats::serialize_movement;
use scof::scof::model::{
    Accidental, GrandStaff, Group, Key, Measure, MeasureAttributes, Movement, Part, PitchName,
    Repeat, Section, Staff, TimeSignature, Track,
};
use scof::scof::parse_movement_with_indent;
use scof::scof::validation::validate_movement;

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9]{0,7}( [A-Za-z0-9#.]{1,6}){0,2}"
}

fn track() -> impl Strategy<Value = Track> {
    name().prop_map(|label| Track::new(0, label))
}

fn leaf_staff() -> impl Strategy<Value = Staff> {
    prop_oneof![
        track().prop_map(Staff::Track),
        prop::collection::vec(track(), 2..4).prop_map(|tracks| Staff::GrandStaff(GrandStaff::new(tracks))),
    ]
}

fn leaf_part() -> impl Strategy<Value = Part> {
    (name(), prop::collection::vec(leaf_staff(), 0..3)).prop_map(|(name, staves)| Part { name, staves })
}

fn section() -> impl Strategy<Value = Section> {
    (
        prop::option::of(name()),
        any::<bool>(),
        prop::collection::vec(leaf_part(), 1..3),
    )
        .prop_map(|(name, condensed, parts)| Section {
            name,
            condensed,
            parts,
        })
}

fn part() -> impl Strategy<Value = Part> {
    let staff = prop_oneof![3 => leaf_staff(), 1 => section().prop_map(Staff::Section)];
    (name(), prop::collection::vec(staff, 0..4)).prop_map(|(name, staves)| Part { name, staves })
}

fn group() -> impl Strategy<Value = Group> {
    prop_oneof![part().prop_map(Group::Part), section().prop_map(Group::Section)]
}

fn key() -> impl Strategy<Value = Key> {
    let tonic = prop::sample::select(vec![
        PitchName::C,
        PitchName::D,
        PitchName::E,
        PitchName::F,
        PitchName::G,
        PitchName::A,
        PitchName::B,
    ]);
    let accidental = prop::option::of(prop::sample::select(vec![
        Accidental::DoubleFlat,
        Accidental::Flat,
        Accidental::Sharp,
        Accidental::DoubleSharp,
    ]));
    (tonic, accidental, any::<bool>()).prop_map(|(tonic, accidental, minor)| Key {
        tonic,
        accidental,
        minor,
    })
}

fn repeat() -> impl Strategy<Value = Repeat> {
    prop_oneof![
        Just(Repeat::Open),
        Just(Repeat::Close),
        Just(Repeat::Segno),
        Just(Repeat::DaCapo),
        Just(Repeat::DalSegno),
        Just(Repeat::Coda),
        Just(Repeat::ToCoda),
        Just(Repeat::Fine),
        (1u8..=u8::MAX).prop_map(Repeat::Ending),
    ]
}

fn measure() -> impl Strategy<Value = Measure> {
    (
        prop::option::of(key()),
        prop::option::of((1u16..=32, 0u32..=6).prop_map(|(beats, exp)| TimeSignature::new(beats, 1 << exp))),
        prop::option::of(1u16..=400),
        prop::option::of(0u8..=100),
        prop::option::of("[ -~\n]{0,16}"),
        prop::collection::vec(repeat(), 0..3),
    )
        .prop_map(|(key, time, tempo, swing, instruction, repeats)| Measure {
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

fn number_part(part: &mut Part, next: &mut u32) {
    for staff in &mut part.staves {
        match staff {
            Staff::Track(track) => number_track(track, next),
            Staff::GrandStaff(grand) => grand.tracks.iter_mut().for_each(|t| number_track(t, next)),
            Staff::Section(section) => section.parts.iter_mut().for_each(|p| number_part(p, next)),
        }
    }
}

fn number_track(track: &mut Track, next: &mut u32) {
    track.id.0 = *next;
    *next += 1;
}

fn movement() -> impl Strategy<Value = Movement> {
    (
        prop::collection::vec(group(), 0..4),
        prop::collection::vec(measure(), 0..6),
    )
        .prop_map(|(mut groups, measures)| {
            let mut next = 0;
            for group in &mut groups {
                match group {
                    Group::Part(part) => number_part(part, &mut next),
                    Group::Section(section) => {
                        section.parts.iter_mut().for_each(|p| number_part(p, &mut next))
                    }
                }
            }
            Movement { groups, measures }
        })
}

proptest! {
    #[test]
    fn generated_movements_are_valid(movement in movement()) {
        prop_assert!(validate_movement(&movement).is_empty(), "{:?}", validate_movement(&movement));
    }

    #[test]
    fn serialize_then_parse_is_identity(movement in movement(), indent_width in 1usize..=8) {
        let text = serialize_movement(&movement, indent_width);
        let parsed = parse_movement_with_indent(&text, indent_width);
        prop_assert!(parsed.is_ok(), "{}\n{:?}", text, parsed.err());
        prop_assert_eq!(parsed.unwrap(), movement);
    }

    #[test]
    fn serialization_is_stable(movement in movement()) {
        let once = serialize_movement(&movement, 4);
        let twice = serialize_movement(&parse_movement_with_indent(&once, 4).unwrap(), 4);
        prop_assert_eq!(once, twice);
    }
}
