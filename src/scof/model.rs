//! Object model for scof scores
//!
//! ## Modules
//!
//! - `attributes` - Key, time signature, tempo, swing and measure overrides
//! - `movement` - Parts, sections, grand staffs, tracks and measures
//! - `repeat` - Repeat and navigation marks on measures
//! - `note` - Note words: duration, pitch, accidental, octave, articulation
//! - `fraction` - Exact lengths in whole notes
//! - `meta` - Score metadata
//! - `document` - The container: metadata, movements and reserved entries

pub mod attributes;
pub mod document;
pub mod fraction;
pub mod meta;
pub mod movement;
pub mod note;
pub mod repeat;

pub use attributes::{
    Accidental, EffectiveAttributes, Key, MeasureAttributes, PitchName, Swing, Tempo, TimeSignature,
    DEFAULT_SWING, DEFAULT_TEMPO,
};
pub use document::{Document, MovementFile};
pub use meta::{Arranger, Meta};
pub use fraction::Fraction;
pub use movement::{GrandStaff, Group, Measure, Movement, Part, Section, Staff, Track, TrackId};
pub use note::{Articulation, Duration, Note, NoteAccidental, NoteValue, Octave, Pitch};
pub use repeat::Repeat;
