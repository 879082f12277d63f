//! Measure attributes
//!
//! Key signature, time signature, tempo, swing and performance instruction. A measure
//! only stores the attributes it overrides; the values in force at a measure
//! are computed from the nearest preceding override (see
//! [`Movement::effective_attributes`](super::Movement::effective_attributes)).

use super::fraction::Fraction;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-G])(bb|b|##|#)?(m)?$").expect("valid key regex"));
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,5})/(\d{1,5})$").expect("valid time regex"));
static TEMPO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,5}$").expect("valid tempo regex"));
static SWING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,3})%$").expect("valid swing regex"));

/// A pitch letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl PitchName {
    pub(crate) fn from_letter(letter: &str) -> Option<Self> {
        Some(match letter {
            "C" => PitchName::C,
            "D" => PitchName::D,
            "E" => PitchName::E,
            "F" => PitchName::F,
            "G" => PitchName::G,
            "A" => PitchName::A,
            "B" => PitchName::B,
            _ => return None,
        })
    }

    pub(crate) fn letter(self) -> &'static str {
        match self {
            PitchName::C => "C",
            PitchName::D => "D",
            PitchName::E => "E",
            PitchName::F => "F",
            PitchName::G => "G",
            PitchName::A => "A",
            PitchName::B => "B",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accidental {
    DoubleFlat,
    Flat,
    Sharp,
    DoubleSharp,
}

impl Accidental {
    fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "bb" => Accidental::DoubleFlat,
            "b" => Accidental::Flat,
            "#" => Accidental::Sharp,
            "##" => Accidental::DoubleSharp,
            _ => return None,
        })
    }

    fn symbol(self) -> &'static str {
        match self {
            Accidental::DoubleFlat => "bb",
            Accidental::Flat => "b",
            Accidental::Sharp => "#",
            Accidental::DoubleSharp => "##",
        }
    }
}

/// A key signature such as `C`, `C#` or `Ebm`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub tonic: PitchName,
    pub accidental: Option<Accidental>,
    pub minor: bool,
}

impl Key {
    pub const fn major(tonic: PitchName) -> Self {
        Key {
            tonic,
            accidental: None,
            minor: false,
        }
    }

    pub fn with_accidental(mut self, accidental: Accidental) -> Self {
        self.accidental = Some(accidental);
        self
    }

    pub fn minor(mut self) -> Self {
        self.minor = true;
        self
    }

    /// Check whether a word has the shape of a key signature
    pub fn matches(word: &str) -> bool {
        KEY_RE.is_match(word)
    }
}

impl Default for Key {
    fn default() -> Self {
        Key::major(PitchName::C)
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = KEY_RE
            .captures(s)
            .ok_or_else(|| format!("'{}' is not a key signature", s))?;
        let tonic = caps
            .get(1)
            .and_then(|m| PitchName::from_letter(m.as_str()))
            .ok_or_else(|| format!("'{}' has no pitch letter", s))?;
        Ok(Key {
            tonic,
            accidental: caps.get(2).and_then(|m| Accidental::from_symbol(m.as_str())),
            minor: caps.get(3).is_some(),
        })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tonic.letter())?;
        if let Some(accidental) = self.accidental {
            write!(f, "{}", accidental.symbol())?;
        }
        if self.minor {
            write!(f, "m")?;
        }
        Ok(())
    }
}

/// A time signature `beats/unit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSignature {
    pub beats: u16,
    pub unit: u16,
}

impl TimeSignature {
    pub const fn new(beats: u16, unit: u16) -> Self {
        TimeSignature { beats, unit }
    }

    pub fn matches(word: &str) -> bool {
        TIME_RE.is_match(word)
    }

    /// Length of one full measure in whole notes, `None` for a zero unit
    pub fn measure_length(self) -> Option<Fraction> {
        Fraction::new(u32::from(self.beats), u32::from(self.unit))
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        TimeSignature::new(4, 4)
    }
}

impl FromStr for TimeSignature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = TIME_RE
            .captures(s)
            .ok_or_else(|| format!("'{}' is not a time signature", s))?;
        let part = |i: usize| -> Result<u16, String> {
            caps[i]
                .parse::<u16>()
                .map_err(|e| format!("'{}' in time signature '{}': {}", &caps[i], s, e))
        };
        Ok(TimeSignature::new(part(1)?, part(2)?))
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.beats, self.unit)
    }
}

/// Tempo in beats per minute
pub type Tempo = u16;

/// Check whether a word has the shape of a tempo
pub fn is_tempo(word: &str) -> bool {
    TEMPO_RE.is_match(word)
}

/// Swing as the percentage of a beat pair given to the first note
///
/// 50 is straight time, 66 is triplet swing.
pub type Swing = u8;

pub const DEFAULT_SWING: Swing = 50;

/// Check whether a word has the shape of a swing percentage
pub fn is_swing(word: &str) -> bool {
    SWING_RE.is_match(word)
}

/// Parse a swing word such as `66%`
pub fn parse_swing(word: &str) -> Result<Swing, String> {
    let caps = SWING_RE
        .captures(word)
        .ok_or_else(|| format!("'{}' is not a swing percentage", word))?;
    caps[1]
        .parse::<Swing>()
        .map_err(|e| format!("swing '{}': {}", word, e))
}

/// Attribute overrides carried by a single measure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureAttributes {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key: Option<Key>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub time: Option<TimeSignature>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tempo: Option<Tempo>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub swing: Option<Swing>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub instruction: Option<String>,
}

impl MeasureAttributes {
    pub fn is_empty(&self) -> bool {
        self.key.is_none()
            && self.time.is_none()
            && self.tempo.is_none()
            && self.swing.is_none()
            && self.instruction.is_none()
    }

    /// Apply these overrides on top of the attributes in force before
    pub fn apply_to(&self, previous: &EffectiveAttributes) -> EffectiveAttributes {
        EffectiveAttributes {
            key: self.key.unwrap_or(previous.key),
            time: self.time.unwrap_or(previous.time),
            tempo: self.tempo.unwrap_or(previous.tempo),
            swing: self.swing.unwrap_or(previous.swing),
            instruction: self
                .instruction
                .clone()
                .or_else(|| previous.instruction.clone()),
        }
    }
}

/// Attributes in force at a measure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveAttributes {
    pub key: Key,
    pub time: TimeSignature,
    pub tempo: Tempo,
    pub swing: Swing,
    pub instruction: Option<String>,
}

pub const DEFAULT_TEMPO: Tempo = 120;

impl Default for EffectiveAttributes {
    /// The baseline before the first measure: C, 4/4, 120 BPM, straight time, no instruction
    fn default() -> Self {
        EffectiveAttributes {
            key: Key::default(),
            time: TimeSignature::default(),
            tempo: DEFAULT_TEMPO,
            swing: DEFAULT_SWING,
            instruction: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parsing() {
        assert_eq!("C".parse::<Key>(), Ok(Key::major(PitchName::C)));
        assert_eq!(
            "C#".parse::<Key>(),
            Ok(Key::major(PitchName::C).with_accidental(Accidental::Sharp))
        );
        assert_eq!(
            "Ebm".parse::<Key>(),
            Ok(Key::major(PitchName::E)
                .with_accidental(Accidental::Flat)
                .minor())
        );
        assert!("H".parse::<Key>().is_err());
        assert!("c".parse::<Key>().is_err());
    }

    #[test]
    fn test_key_display_is_canonical() {
        for text in ["C", "F#", "Bbb", "G##m", "Abm"] {
            assert_eq!(text.parse::<Key>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_time_signature() {
        assert_eq!("15/16".parse::<TimeSignature>(), Ok(TimeSignature::new(15, 16)));
        assert_eq!(TimeSignature::new(6, 8).to_string(), "6/8");
        assert!("4-4".parse::<TimeSignature>().is_err());
        assert!("99999/4".parse::<TimeSignature>().is_err());
    }

    #[test]
    fn test_word_shapes() {
        assert!(Key::matches("Db"));
        assert!(!Key::matches("160"));
        assert!(TimeSignature::matches("3/4"));
        assert!(is_tempo("160"));
        assert!(!is_tempo("3/4"));
        assert!(is_swing("66%"));
        assert!(!is_swing("66"));
        assert!(!is_tempo("66%"));
    }

    #[test]
    fn test_swing() {
        assert_eq!(parse_swing("66%"), Ok(66));
        assert_eq!(parse_swing("0%"), Ok(0));
        assert!(parse_swing("300%").is_err());
        assert!(parse_swing("%").is_err());
    }

    #[test]
    fn test_measure_length() {
        assert_eq!(TimeSignature::new(6, 8).measure_length(), Fraction::new(3, 4));
        assert_eq!(TimeSignature::default().measure_length(), Some(Fraction::WHOLE));
        assert_eq!(TimeSignature::new(3, 0).measure_length(), None);
    }

    #[test]
    fn test_apply_overrides() {
        let base = EffectiveAttributes::default();
        let overrides = MeasureAttributes {
            tempo: Some(90),
            ..Default::default()
        };
        let effective = overrides.apply_to(&base);
        assert_eq!(effective.tempo, 90);
        assert_eq!(effective.key, Key::default());
        assert_eq!(effective.time, TimeSignature::new(4, 4));
        assert_eq!(effective.swing, DEFAULT_SWING);
        assert_eq!(effective.instruction, None);
    }
}
