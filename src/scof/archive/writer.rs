//! Archive writer
//!
//! Entries are written in a fixed order: the metadata entry, one entry per
//! movement in document order, then the reserved entries the document carries.

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::scof::config::{Compression, ScofConfig};
use crate::scof::error::{ArchiveError, ScofError};
use crate::scof::formats::{serialize_meta, serialize_movement};
use crate::scof::model::Document;

/// Entry names and texts for a document, in write order
pub fn archive_entries(document: &Document, config: &ScofConfig) -> Vec<(String, String)> {
    let indent_width = config.format.indent_width;
    let mut entries = Vec::with_capacity(document.movements.len() + document.reserved.len() + 1);
    entries.push((
        config.archive.metadata_entry.clone(),
        serialize_meta(&document.meta, indent_width),
    ));
    for file in &document.movements {
        entries.push((
            config.archive.movement_entry(&file.name),
            serialize_movement(&file.movement, indent_width),
        ));
    }
    for (name, text) in &document.reserved {
        entries.push((name.clone(), text.clone()));
    }
    entries
}

/// Write a document as a zip archive into `writer`, handing it back when done
pub fn write_archive<W: Write + Seek>(
    writer: W,
    document: &Document,
    config: &ScofConfig,
) -> Result<W, ScofError> {
    let entries = archive_entries(document, config);
    let writer = write_entries(
        writer,
        entries.iter().map(|(name, text)| (name.as_str(), text.as_bytes())),
        config.archive.compression,
    )?;
    log::debug!("wrote '{}' with {} entr(ies)", document.title, entries.len());
    Ok(writer)
}

/// Write a document to a file
pub fn write_path(
    path: impl AsRef<Path>,
    document: &Document,
    config: &ScofConfig,
) -> Result<(), ScofError> {
    let file = File::create(path.as_ref()).map_err(ArchiveError::from)?;
    let mut file = write_archive(file, document, config)?;
    file.flush().map_err(ArchiveError::from)?;
    Ok(())
}

pub(crate) fn write_entries<'a, W, I>(
    writer: W,
    entries: I,
    compression: Compression,
) -> Result<W, ArchiveError>
where
    W: Write + Seek,
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default().compression_method(match compression {
        Compression::Stored => CompressionMethod::Stored,
        Compression::Deflated => CompressionMethod::Deflated,
    });
    for (name, bytes) in entries {
        zip.start_file(name, options)?;
        zip.write_all(bytes)?;
    }
    Ok(zip.finish()?)
}
