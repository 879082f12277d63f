//! Archive reader
//!
//! Reading happens in two steps. Every entry is pulled out of the zip first,
//! so the archive handle is released before any text is parsed. The raw
//! entries are then dispatched by name and assembled into a [`Document`].
//!
//! Archive-level problems (corrupt zip, missing required entry, too few
//! movements, an unrecognized entry in strict mode) fail the whole load. A bad
//! metadata or movement entry only fails that entry: it is recorded in
//! [`LoadedDocument::failures`] and the other entries still load.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::thread;

use zip::ZipArchive;

use super::entries::{classify, EntryKind};
use crate::scof::config::ScofConfig;
use crate::scof::error::{ArchiveError, ScofError};
use crate::scof::formats::parse_meta;
use crate::scof::model::{Document, Movement};
use crate::scof::parse_movement_with_indent;

/// A raw archive entry: name and bytes
pub type RawEntry = (String, Vec<u8>);

/// A single entry that could not be loaded
#[derive(Debug)]
pub struct EntryFailure {
    pub entry: String,
    pub error: ScofError,
}

/// The result of loading an archive
#[derive(Debug)]
pub struct LoadedDocument {
    pub document: Document,
    /// Entries that failed to parse, in archive order
    pub failures: Vec<EntryFailure>,
}

impl LoadedDocument {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// The document, or the first entry failure
    pub fn into_strict(self) -> Result<Document, ScofError> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure.error.in_entry(failure.entry)),
            None => Ok(self.document),
        }
    }
}

/// Read an archive file; the title comes from the file name
pub fn read_path(path: impl AsRef<Path>, config: &ScofConfig) -> Result<LoadedDocument, ScofError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(ArchiveError::from)?;
    log::debug!("reading archive {}", path.display());
    read_archive(BufReader::new(file), Document::title_from_path(path), config)
}

/// Read an archive from any seekable source
pub fn read_archive<R: Read + Seek>(
    reader: R,
    title: impl Into<String>,
    config: &ScofConfig,
) -> Result<LoadedDocument, ScofError> {
    let entries = read_raw_entries(reader)?;
    assemble(entries, title, config)
}

/// Pull every file entry out of a zip archive, in archive order
pub fn read_raw_entries<R: Read + Seek>(reader: R) -> Result<Vec<RawEntry>, ArchiveError> {
    let mut zip = ZipArchive::new(reader)?;
    let mut entries = Vec::with_capacity(zip.len());
    for index in 0..zip.len() {
        let mut file = zip.by_index(index)?;
        if file.is_dir() {
            continue;
        }
        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)?;
        entries.push((file.name().to_string(), bytes));
    }
    Ok(entries)
}

/// Dispatch raw entries by name and build the document
pub fn assemble(
    entries: Vec<RawEntry>,
    title: impl Into<String>,
    config: &ScofConfig,
) -> Result<LoadedDocument, ScofError> {
    let archive = &config.archive;
    let indent_width = config.format.indent_width;

    for required in &archive.required_entries {
        if !entries.iter().any(|(name, _)| name == required) {
            return Err(ArchiveError::MissingEntry(required.clone()).into());
        }
    }

    let mut document = Document::new(title);
    let mut failures = Vec::new();
    let mut meta_source = None;
    // (movement name, entry name, text) in archive order
    let mut movement_sources: Vec<(String, String, String)> = Vec::new();
    let mut movement_entries = 0;

    for (name, bytes) in entries {
        let kind = classify(&name, archive);
        let movement = match kind {
            EntryKind::Directory => continue,
            EntryKind::Unknown if archive.strict_entries => {
                return Err(ScofError::UnrecognizedEntry(name.clone()))
            }
            EntryKind::Unknown => {
                log::warn!("skipping unrecognized archive entry '{}'", name);
                continue;
            }
            EntryKind::Movement(movement) => {
                movement_entries += 1;
                Some(movement.to_string())
            }
            EntryKind::Metadata | EntryKind::Reserved => None,
        };

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => {
                failures.push(EntryFailure {
                    error: ArchiveError::Encoding(name.clone()).into(),
                    entry: name,
                });
                continue;
            }
        };

        match movement {
            Some(movement) => movement_sources.push((movement, name, text)),
            None if name == archive.metadata_entry => meta_source = Some((name, text)),
            None => {
                document.reserved.insert(name, text);
            }
        }
    }

    if movement_entries < archive.min_movements {
        return Err(ArchiveError::TooFewMovements {
            found: movement_entries,
            required: archive.min_movements,
        }
        .into());
    }

    if let Some((entry, text)) = meta_source {
        match parse_meta(&text, indent_width) {
            Ok(meta) => document.meta = meta,
            Err(error) => failures.push(EntryFailure { entry, error }),
        }
    }

    let parsed = parse_movements(&movement_sources, indent_width, archive.parallel);
    let mut loaded: Vec<(String, Movement)> = Vec::new();
    for ((movement, entry, _), result) in movement_sources.into_iter().zip(parsed) {
        match result {
            Ok(parsed) => loaded.push((movement, parsed)),
            Err(error) => failures.push(EntryFailure { entry, error }),
        }
    }

    // Listed movements first, in the metadata's order; the rest as stored
    let order = document.meta.movements.clone();
    loaded.sort_by_key(|(name, _)| order.iter().position(|listed| listed == name).unwrap_or(usize::MAX));
    for (name, movement) in loaded {
        document.push_movement(name, movement);
    }

    log::debug!(
        "loaded '{}': {} movement(s), {} reserved entr(ies), {} failure(s)",
        document.title,
        document.movements.len(),
        document.reserved.len(),
        failures.len()
    );
    Ok(LoadedDocument { document, failures })
}

fn parse_movements(
    sources: &[(String, String, String)],
    indent_width: usize,
    parallel: bool,
) -> Vec<Result<Movement, ScofError>> {
    if !parallel || sources.len() < 2 {
        return sources
            .iter()
            .map(|(_, _, text)| parse_movement_with_indent(text, indent_width))
            .collect();
    }

    thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .map(|(_, _, text)| scope.spawn(move || parse_movement_with_indent(text, indent_width)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    })
}
