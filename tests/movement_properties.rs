//! End-to-end properties of movement parsing
//!
//! Uses the curated samples in `docs/samples` where possible.

use rstest::rstest;
use scof::scof::error::ScofError;
use scof::scof::lexer::Tokenizer;
use scof::scof::model::{
    Accidental, GrandStaff, Group, Key, Movement, Part, PitchName, TimeSignature, Track,
};
use scof::scof::parse_movement;
use scof::scof::parser::parse;
use scof::scof::processor::scof_sources::ScofSources;

#[test]
fn test_piano_example() {
    let source = ScofSources::get_string("010-piano.muon").unwrap();
    let movement = parse_movement(&source).unwrap();

    let expected = Movement::new().with_group(Group::Part(
        Part::new("Piano")
            .with_track(Track::new(0, "voice"))
            .with_grand_staff(GrandStaff::new(vec![
                Track::new(1, "piano"),
                Track::new(2, "piano"),
            ])),
    ));
    assert_eq!(movement, expected);
    assert!(movement.measures.is_empty());
}

#[test]
fn test_comments_are_stripped() {
    let commented = parse_movement("P Piano // the only part\n    T0 voice // Add voice track.\n").unwrap();
    let plain = parse_movement("P Piano\n    T0 voice\n").unwrap();
    assert_eq!(commented, plain);
}

#[test]
fn test_comment_inside_quotes_is_kept() {
    let movement = parse_movement("M \"a // b\" // trailing\n").unwrap();
    assert_eq!(
        movement.measures[0].overrides.instruction.as_deref(),
        Some("a // b")
    );
}

#[test]
fn test_measure_inheritance() {
    let movement = parse_movement("M\nM C# 15/16 160 \"Aggressively\"\nM\n").unwrap();
    let c_sharp = Key::major(PitchName::C).with_accidental(Accidental::Sharp);

    let first = movement.effective_attributes(0).unwrap();
    assert_eq!(first.key, Key::major(PitchName::C));
    assert_eq!(first.time, TimeSignature::new(4, 4));
    assert_eq!(first.tempo, 120);
    assert_eq!(first.instruction, None);

    for index in [1, 2] {
        let effective = movement.effective_attributes(index).unwrap();
        assert_eq!(effective.key, c_sharp);
        assert_eq!(effective.time, TimeSignature::new(15, 16));
        assert_eq!(effective.tempo, 160);
        assert_eq!(effective.instruction.as_deref(), Some("Aggressively"));
    }

    // The third measure stores nothing of its own
    assert!(movement.measures[2].overrides.is_empty());
}

#[test]
fn test_sample_measures() {
    let source = ScofSources::get_string("030-measures.muon").unwrap();
    let movement = parse_movement(&source).unwrap();
    let effective: Vec<_> = movement.effective_measures().collect();
    assert_eq!(effective.len(), 5);
    assert_eq!(effective[3].key.to_string(), "Ebm");
    assert_eq!(effective[3].tempo, 160);
    assert_eq!(effective[4].tempo, 72);
    assert_eq!(
        effective[4].instruction.as_deref(),
        Some("rit. \"poco\" // not a comment")
    );
}

#[test]
fn test_duplicate_track_id_is_rejected() {
    let err = parse_movement("P A\n    T3 a\nP B\n    T3 b\n").unwrap_err();
    assert!(matches!(
        err,
        ScofError::DuplicateTrackId {
            line: 4,
            id: 3,
            first_line: 2
        }
    ));
}

#[rstest]
#[case("010-piano.muon")]
#[case("020-sections.muon")]
#[case("030-measures.muon")]
fn test_children_sit_one_level_below_parents(#[case] sample: &str) {
    let source = ScofSources::get_string(sample).unwrap();
    let tree = parse(&source).unwrap();
    for node in tree.nodes() {
        for &child in &node.children {
            assert_eq!(tree.node(child).depth, node.depth + 1);
        }
    }
    for &root in tree.roots() {
        assert_eq!(tree.node(root).depth, 0);
    }
}

#[rstest]
#[case("010-piano.muon")]
#[case("020-sections.muon")]
#[case("030-measures.muon")]
fn test_records_skip_blank_and_comment_lines(#[case] sample: &str) {
    let source = ScofSources::get_string(sample).unwrap();
    let records = Tokenizer::new(&source)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let statement_lines = source
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with("//")
        })
        .count();
    assert_eq!(records.len(), statement_lines);
}

#[rstest]
#[case("T0 voice\n", 1)]
#[case("P Piano\n    T0 voice\nG\n", 3)]
#[case("P Piano\n    C\n", 2)]
#[case("S\n    T1 horn\n", 2)]
#[case("P Piano\n  T0 voice\n", 2)]
#[case("P Piano\n    X1 voice\n", 2)]
#[case("P Piano\n    T0\n", 2)]
#[case("M 4/4 C\n", 1)]
fn test_errors_carry_line_numbers(#[case] source: &str, #[case] line: usize) {
    let err = parse_movement(source).unwrap_err();
    assert_eq!(err.line(), Some(line), "{}", err);
}

#[test]
fn test_sections_sample_shape() {
    let source = ScofSources::get_string("020-sections.muon").unwrap();
    let movement = parse_movement(&source).unwrap();
    let ids: Vec<u32> = movement.tracks().iter().map(|t| t.id.0).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
    match &movement.groups[0] {
        Group::Section(strings) => {
            assert!(strings.condensed);
            assert_eq!(strings.parts.len(), 3);
        }
        other => panic!("expected the strings section, got {:?}", other),
    }
}
