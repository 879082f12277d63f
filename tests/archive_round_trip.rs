//! Archive write → read round trips on disk

use std::fs;

use scof::scof::archive::{pack_directory, read_path, unpack_archive, write_path};
use scof::scof::config::{Loader, ScofConfig};
use scof::scof::error::{ArchiveError, ScofError};
use scof::scof::model::{Arranger, Document, Group, Measure, MeasureAttributes, Movement, Part, Track};
use scof::scof::processor::scof_sources::ScofSources;
use scof::scof::validation::validate_document;
use tempfile::tempdir;

fn suite() -> Document {
    let mut document = Document::new("Suite / No. 2");
    document.meta.composer = "Anonymous Baroque".to_string();
    document.meta.arrangers.push(Arranger {
        name: "Jane Roe".to_string(),
        ensemble: Some("Wind Quintet".to_string()),
    });
    document.meta.licenses.push("CC-BY-4.0".to_string());
    document.meta.grade = Some(5);
    for (name, tempo) in [("Prelude", 72), ("Gavotte", 112)] {
        document.push_movement(
            name,
            Movement::new()
                .with_group(Group::Part(Part::new("Flute").with_track(Track::new(0, "flute"))))
                .with_measure(Measure::new(MeasureAttributes {
                    tempo: Some(tempo),
                    ..Default::default()
                }))
                .with_measure(Measure::default()),
        );
    }
    document
        .reserved
        .insert("Style.muon".to_string(), "sig:\n    time_symbol: false\n".to_string());
    document
}

#[test]
fn test_write_then_read_file() {
    let dir = tempdir().unwrap();
    let document = suite();
    let path = dir.path().join(document.file_name());
    assert!(path.ends_with("Suite \\ No. 2.scof"));

    write_path(&path, &document, &ScofConfig::default()).unwrap();
    let loaded = read_path(&path, &ScofConfig::default()).unwrap();

    assert!(loaded.is_clean());
    assert_eq!(loaded.document, document);
    assert!(validate_document(&loaded.document).is_empty());
}

#[test]
fn test_metadata_that_validates_survives_the_round_trip() {
    let dir = tempdir().unwrap();
    let mut document = suite();
    document.meta.composer = "J. S. Bach".to_string();
    document.meta.subtitle = Some("Air/Gigue//Bourree".to_string());
    assert!(validate_document(&document).is_empty());

    let path = dir.path().join(document.file_name());
    write_path(&path, &document, &ScofConfig::default()).unwrap();
    let loaded = read_path(&path, &ScofConfig::default()).unwrap();
    assert!(loaded.is_clean());
    assert_eq!(loaded.document.meta, document.meta);
}

#[test]
fn test_metadata_that_cannot_be_written_is_reported() {
    let mut document = suite();
    document.meta.composer = "J. S.\nBach".to_string();
    document.meta.arrangers[0].name = " Jane Roe".to_string();
    let violations: Vec<_> = validate_document(&document)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        violations,
        vec![
            "Meta: composer contains a line break",
            "Meta > arranger#1: arranger name has leading or trailing whitespace",
        ]
    );
}

#[test]
fn test_stored_compression_round_trips() {
    let dir = tempdir().unwrap();
    let config = Loader::new()
        .set_override("archive.compression", "stored")
        .unwrap()
        .build()
        .unwrap();
    let path = dir.path().join("stored.scof");
    write_path(&path, &suite(), &config).unwrap();
    let loaded = read_path(&path, &config).unwrap();
    assert_eq!(loaded.document.title, "stored");
    assert_eq!(loaded.document.movements.len(), 2);
}

#[test]
fn test_pack_sample_then_read() {
    let dir = tempdir().unwrap();
    let archive = dir.path().join("Canon in D.scof");
    let config = ScofConfig::default();

    let packed = pack_directory(ScofSources::sample_path("Canon in D"), &archive, &config).unwrap();
    assert_eq!(packed, 4);

    let document = read_path(&archive, &config).unwrap().into_strict().unwrap();
    assert_eq!(document.title, "Canon in D");
    assert_eq!(document.meta.movements, vec!["Canon", "Gigue"]);
    assert_eq!(document.meta.arrangers[0].ensemble.as_deref(), Some("String Quartet"));
    assert!(document.reserved.contains_key("Style.muon"));
    assert_eq!(document.movement("Canon").unwrap().tracks().len(), 6);
    assert!(validate_document(&document).is_empty());

    let unpacked = dir.path().join("out");
    assert_eq!(unpack_archive(&archive, &unpacked).unwrap(), 4);
    assert_eq!(
        fs::read_to_string(unpacked.join("Movement").join("Gigue.muon")).unwrap(),
        fs::read_to_string(ScofSources::sample_path("Canon in D/Movement/Gigue.muon")).unwrap()
    );
}

#[test]
fn test_corrupt_archive_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.scof");
    fs::write(&path, b"not a zip file").unwrap();
    let err = read_path(&path, &ScofConfig::default()).unwrap_err();
    assert!(matches!(err, ScofError::ArchiveIo(ArchiveError::Zip(_))));
}

#[test]
fn test_missing_archive_is_io_error() {
    let dir = tempdir().unwrap();
    let err = read_path(dir.path().join("absent.scof"), &ScofConfig::default()).unwrap_err();
    assert!(matches!(err, ScofError::ArchiveIo(ArchiveError::Io(_))));
}
