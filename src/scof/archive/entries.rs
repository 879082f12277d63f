//! Archive entry names

use crate::scof::config::ArchiveConfig;

/// What an archive entry holds, decided by its name alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind<'a> {
    Metadata,
    Movement(&'a str),
    /// Recognized but not interpreted
    Reserved,
    Directory,
    Unknown,
}

pub fn classify<'a>(name: &'a str, config: &ArchiveConfig) -> EntryKind<'a> {
    if name.ends_with('/') {
        EntryKind::Directory
    } else if name == config.metadata_entry {
        EntryKind::Metadata
    } else if config.is_reserved(name) {
        EntryKind::Reserved
    } else if let Some(movement) = config.movement_name(name) {
        EntryKind::Movement(movement)
    } else {
        EntryKind::Unknown
    }
}
