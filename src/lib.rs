//! # scof
//!
//! Reader, writer and validator for scof, a music score container: a zip
//! archive of indentation-structured text entries.
//!
//! A movement entry declares parts, sections, grand staffs and tracks, then a
//! flat list of measures:
//!
//! ```text
//! P Piano
//!     T0 voice // Add voice track.
//!     G
//!         T1 piano
//!         T2 piano
//! M C# 15/16 160 "Aggressively"
//! ```
//!
//! Start with [`scof::parse_movement`] for single files and
//! [`scof::archive::read_path`] for whole scores.

pub mod scof;
