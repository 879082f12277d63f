//! Score metadata

use serde::{Deserialize, Serialize};

pub const DEFAULT_COMPOSER: &str = "Anonymous";

/// Arranger and the ensemble they arranged for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arranger {
    pub name: String,
    pub ensemble: Option<String>,
}

/// Score metadata, stored as its own archive entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Who wrote the original music
    pub composer: String,
    pub subtitle: Option<String>,
    /// Work number
    pub number: Option<u32>,
    pub lyricist: Option<String>,
    pub translator: Option<String>,
    pub performers: Option<String>,
    /// Arrangements, oldest first
    pub arrangers: Vec<Arranger>,
    /// People who revised the score, in order
    pub revised: Vec<String>,
    pub licenses: Vec<String>,
    /// Playing level times two, so grade 1.5 is stored as 3
    pub grade: Option<u8>,
    /// Movement names in playing order
    pub movements: Vec<String>,
}

impl Default for Meta {
    fn default() -> Self {
        Meta {
            composer: DEFAULT_COMPOSER.to_string(),
            subtitle: None,
            number: None,
            lyricist: None,
            translator: None,
            performers: None,
            arrangers: Vec::new(),
            revised: Vec::new(),
            licenses: Vec::new(),
            grade: None,
            movements: Vec::new(),
        }
    }
}
