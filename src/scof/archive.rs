//! Zip container mapping
//!
//! ## Modules
//!
//! - `entries` - what each entry name means
//! - `reader` - archive to [`Document`](crate::scof::model::Document), with per-entry failures
//! - `writer` - document to archive
//! - `directory` - pack, unpack and load unpacked archives

pub mod directory;
pub mod entries;
pub mod reader;
pub mod writer;

pub use directory::{collect_directory, pack_directory, read_directory, unpack_archive};
pub use entries::{classify, EntryKind};
pub use reader::{assemble, read_archive, read_path, read_raw_entries, EntryFailure, LoadedDocument, RawEntry};
pub use writer::{archive_entries, write_archive, write_path};
