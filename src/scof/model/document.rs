//! The whole score container

use super::meta::Meta;
use super::movement::Movement;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const UNTITLED: &str = "Untitled Score";
pub const MAX_TITLE_CHARS: usize = 64;

/// A movement together with the name it is stored under
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementFile {
    pub name: String,
    pub movement: Movement,
}

impl MovementFile {
    pub fn new(name: impl Into<String>, movement: Movement) -> Self {
        MovementFile {
            name: name.into(),
            movement,
        }
    }
}

/// A score: metadata, movements and entries reserved for later schemas
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub title: String,
    pub meta: Meta,
    pub movements: Vec<MovementFile>,
    /// Recognized but uninterpreted entries (style, synthesis), by entry name
    pub reserved: BTreeMap<String, String>,
}

impl Default for Document {
    fn default() -> Self {
        Document {
            title: UNTITLED.to_string(),
            meta: Meta::default(),
            movements: Vec::new(),
            reserved: BTreeMap::new(),
        }
    }
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Document {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Add a movement and list it in the metadata's playing order
    pub fn push_movement(&mut self, name: impl Into<String>, movement: Movement) {
        let name = name.into();
        if !self.meta.movements.contains(&name) {
            self.meta.movements.push(name.clone());
        }
        self.movements.push(MovementFile::new(name, movement));
    }

    pub fn movement(&self, name: &str) -> Option<&Movement> {
        self.movements
            .iter()
            .find(|m| m.name == name)
            .map(|m| &m.movement)
    }

    /// Title from an archive file name
    ///
    /// `My Score \ Symphony No. 1.scof` becomes `My Score / Symphony No. 1`:
    /// the stem is used, backslashes stand for slashes, and the result is cut
    /// to 64 characters.
    pub fn title_from_path(path: &Path) -> String {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        let title: String = stem.trim().chars().take(MAX_TITLE_CHARS).collect();
        if title.is_empty() {
            UNTITLED.to_string()
        } else {
            title
        }
    }

    /// File name an archive with this title is saved under
    pub fn file_name(&self) -> String {
        format!("{}.scof", self.title.replace('/', "\\"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_path() {
        assert_eq!(
            Document::title_from_path(Path::new("My Score \\ Symphony No. 1.scof")),
            "My Score / Symphony No. 1"
        );
        assert_eq!(Document::title_from_path(Path::new(".scof")), ".scof");
        assert_eq!(Document::title_from_path(Path::new("")), UNTITLED);
        let long = "x".repeat(100) + ".scof";
        assert_eq!(Document::title_from_path(Path::new(&long)).len(), 64);
    }

    #[test]
    fn test_file_name_round_trips_title() {
        let doc = Document::new("A / B");
        assert_eq!(doc.file_name(), "A \\ B.scof");
        assert_eq!(Document::title_from_path(Path::new(&doc.file_name())), "A / B");
    }

    #[test]
    fn test_push_movement_records_order() {
        let mut doc = Document::default();
        doc.push_movement("One", Movement::new());
        doc.push_movement("Two", Movement::new());
        assert_eq!(doc.meta.movements, vec!["One", "Two"]);
        assert!(doc.movement("Two").is_some());
    }
}
