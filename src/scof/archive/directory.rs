//! Unpacked archives
//!
//! A directory with the same layout as an archive (`Meta.muon`,
//! `Movement/<name>.muon`, ...) can be packed into a `.scof` file, loaded
//! directly, or produced by unpacking one.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use zip::ZipArchive;

use super::reader::{assemble, LoadedDocument, RawEntry};
use super::writer::write_entries;
use crate::scof::config::ScofConfig;
use crate::scof::error::{ArchiveError, ScofError};
use crate::scof::model::Document;

/// Every file below `dir`, named the way it would be inside an archive
pub fn collect_directory(dir: &Path) -> Result<Vec<RawEntry>, ArchiveError> {
    let mut entries = Vec::new();
    collect_into(dir, "", &mut entries)?;
    Ok(entries)
}

fn collect_into(dir: &Path, prefix: &str, entries: &mut Vec<RawEntry>) -> Result<(), ArchiveError> {
    let mut children = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    children.sort_by_key(|child| child.file_name());
    for child in children {
        let file_name = child.file_name();
        let name = format!("{}{}", prefix, file_name.to_string_lossy());
        let path = child.path();
        if child.file_type()?.is_dir() {
            collect_into(&path, &format!("{}/", name), entries)?;
        } else {
            entries.push((name, fs::read(&path)?));
        }
    }
    Ok(())
}

/// Load an unpacked archive; the title comes from the directory name
pub fn read_directory(dir: impl AsRef<Path>, config: &ScofConfig) -> Result<LoadedDocument, ScofError> {
    let dir = dir.as_ref();
    let entries = collect_directory(dir)?;
    assemble(entries, Document::title_from_path(dir), config)
}

/// Zip the files below `dir` into `archive`, returning the entry count
///
/// Entries are copied byte for byte and are not parsed.
pub fn pack_directory(
    dir: impl AsRef<Path>,
    archive: impl AsRef<Path>,
    config: &ScofConfig,
) -> Result<usize, ScofError> {
    let entries = collect_directory(dir.as_ref())?;
    let file = File::create(archive.as_ref()).map_err(ArchiveError::from)?;
    write_entries(
        file,
        entries.iter().map(|(name, bytes)| (name.as_str(), bytes.as_slice())),
        config.archive.compression,
    )?;
    log::debug!("packed {} entr(ies) into {}", entries.len(), archive.as_ref().display());
    Ok(entries.len())
}

/// Extract every entry of `archive` below `dir`, returning the file count
///
/// Entries whose names would escape `dir` are skipped.
pub fn unpack_archive(archive: impl AsRef<Path>, dir: impl AsRef<Path>) -> Result<usize, ScofError> {
    let dir = dir.as_ref();
    let file = File::open(archive.as_ref()).map_err(ArchiveError::from)?;
    let mut zip = ZipArchive::new(io::BufReader::new(file)).map_err(ArchiveError::from)?;
    let mut written = 0;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(ArchiveError::from)?;
        let target = match entry.enclosed_name() {
            Some(relative) => dir.join(relative),
            None => {
                log::warn!("skipping unsafe entry name '{}'", entry.name());
                continue;
            }
        };
        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(ArchiveError::from)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(ArchiveError::from)?;
        }
        let mut out = File::create(&target).map_err(ArchiveError::from)?;
        io::copy(&mut entry, &mut out).map_err(ArchiveError::from)?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_pack_read_unpack() {
        let root = tempdir().unwrap();
        let source = root.path().join("Fanfare");
        fs::create_dir_all(source.join("Movement")).unwrap();
        fs::write(source.join("Meta.muon"), "composer: Dukas\n").unwrap();
        fs::write(source.join("Movement").join("Fanfare.muon"), "P Brass\n    T0 trumpet\nM Bb\n").unwrap();

        let from_dir = read_directory(&source, &ScofConfig::default()).unwrap();
        assert!(from_dir.is_clean());
        assert_eq!(from_dir.document.title, "Fanfare");

        let archive = root.path().join("Fanfare.scof");
        assert_eq!(pack_directory(&source, &archive, &ScofConfig::default()).unwrap(), 2);

        let unpacked = root.path().join("unpacked");
        assert_eq!(unpack_archive(&archive, &unpacked).unwrap(), 2);
        assert_eq!(
            fs::read_to_string(unpacked.join("Movement").join("Fanfare.muon")).unwrap(),
            "P Brass\n    T0 trumpet\nM Bb\n"
        );
    }
}
