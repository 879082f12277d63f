//! Note words
//!
//! A note is written as a single word: a duration letter, augmentation dots,
//! then either `R` for a rest or a pitch letter with an optional accidental, an
//! octave digit and an optional articulation.
//!
//! ```text
//! Q.C#4>     dotted quarter, C sharp in octave 4, accented
//! TR         eighth rest
//! WBd-_.     whole note, B a quarter tone flat in octave -1, tenuto staccato
//! ```
//!
//! Duration letters, longest first: `L` longa, `V` breve, `W` whole, `U` half,
//! `Q` quarter, `T` eighth, `S` 16th, `Y` 32nd, `X` 64th, `O` 128th.
//!
//! Accidentals go down to a double flat and up to a double sharp in quarter
//! tones: `bb` `db` `b` `d` `n` `t` `#` `t#` `x`. The octave is `-` for -1 or a
//! digit from 0 to 9; middle C is `C4`.
//!
//! Articulations: `^` marcato, `>` accent, `.` staccato, `'` staccatissimo,
//! `_` tenuto, and the pairs `_.` `^.` `^_` `>.` `>_`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::attributes::PitchName;
use super::fraction::Fraction;

static NOTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([LVWUQTSYXO])(\.*)(?:R|([A-G])(bb|db|t#|b|d|n|t|#|x)?([-0-9])(_\.|\^\.|\^_|>\.|>_|\^|>|\.|'|_)?)$",
    )
    .expect("valid note regex")
});

/// Undotted note length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NoteValue {
    Longa,
    Breve,
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
    OneTwentyEighth,
}

impl NoteValue {
    fn from_letter(letter: &str) -> Option<Self> {
        Some(match letter {
            "L" => NoteValue::Longa,
            "V" => NoteValue::Breve,
            "W" => NoteValue::Whole,
            "U" => NoteValue::Half,
            "Q" => NoteValue::Quarter,
            "T" => NoteValue::Eighth,
            "S" => NoteValue::Sixteenth,
            "Y" => NoteValue::ThirtySecond,
            "X" => NoteValue::SixtyFourth,
            "O" => NoteValue::OneTwentyEighth,
            _ => return None,
        })
    }

    fn letter(self) -> char {
        match self {
            NoteValue::Longa => 'L',
            NoteValue::Breve => 'V',
            NoteValue::Whole => 'W',
            NoteValue::Half => 'U',
            NoteValue::Quarter => 'Q',
            NoteValue::Eighth => 'T',
            NoteValue::Sixteenth => 'S',
            NoteValue::ThirtySecond => 'Y',
            NoteValue::SixtyFourth => 'X',
            NoteValue::OneTwentyEighth => 'O',
        }
    }

    /// Length in whole notes as `(count, halvings)`
    fn dyadic(self) -> (u32, u32) {
        match self {
            NoteValue::Longa => (4, 0),
            NoteValue::Breve => (2, 0),
            NoteValue::Whole => (1, 0),
            NoteValue::Half => (1, 1),
            NoteValue::Quarter => (1, 2),
            NoteValue::Eighth => (1, 3),
            NoteValue::Sixteenth => (1, 4),
            NoteValue::ThirtySecond => (1, 5),
            NoteValue::SixtyFourth => (1, 6),
            NoteValue::OneTwentyEighth => (1, 7),
        }
    }

    /// Most augmentation dots this value can carry
    pub fn max_dots(self) -> u8 {
        match self {
            NoteValue::Longa | NoteValue::OneTwentyEighth => 0,
            NoteValue::Breve | NoteValue::SixtyFourth => 1,
            NoteValue::Whole | NoteValue::ThirtySecond => 2,
            NoteValue::Half | NoteValue::Sixteenth => 3,
            NoteValue::Quarter | NoteValue::Eighth => 4,
        }
    }

    pub fn length(self) -> Fraction {
        let (count, halvings) = self.dyadic();
        Fraction::dyadic(count, halvings)
    }
}

/// A note value with augmentation dots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Duration {
    value: NoteValue,
    dots: u8,
}

impl Duration {
    /// `None` when `value` cannot carry that many dots
    pub fn new(value: NoteValue, dots: u8) -> Option<Self> {
        (dots <= value.max_dots()).then_some(Duration { value, dots })
    }

    pub fn value(self) -> NoteValue {
        self.value
    }

    pub fn dots(self) -> u8 {
        self.dots
    }

    /// Add a dot, if the value has room for one
    pub fn augment(&mut self) {
        self.dots = (self.dots + 1).min(self.value.max_dots());
    }

    /// Remove a dot, if there is one
    pub fn diminish(&mut self) {
        self.dots = self.dots.saturating_sub(1);
    }

    /// Length in whole notes; each dot adds half of the previous addition
    pub fn length(self) -> Fraction {
        let (count, halvings) = self.value.dyadic();
        let dots = u32::from(self.dots);
        Fraction::dyadic(count * ((2 << dots) - 1), halvings + dots)
    }
}

impl From<NoteValue> for Duration {
    fn from(value: NoteValue) -> Self {
        Duration { value, dots: 0 }
    }
}

/// Note accidental in quarter tones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NoteAccidental {
    DoubleFlat,
    ThreeQuarterFlat,
    Flat,
    QuarterFlat,
    Natural,
    QuarterSharp,
    Sharp,
    ThreeQuarterSharp,
    DoubleSharp,
}

impl NoteAccidental {
    fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "bb" => NoteAccidental::DoubleFlat,
            "db" => NoteAccidental::ThreeQuarterFlat,
            "b" => NoteAccidental::Flat,
            "d" => NoteAccidental::QuarterFlat,
            "n" => NoteAccidental::Natural,
            "t" => NoteAccidental::QuarterSharp,
            "#" => NoteAccidental::Sharp,
            "t#" => NoteAccidental::ThreeQuarterSharp,
            "x" => NoteAccidental::DoubleSharp,
            _ => return None,
        })
    }

    fn symbol(self) -> &'static str {
        match self {
            NoteAccidental::DoubleFlat => "bb",
            NoteAccidental::ThreeQuarterFlat => "db",
            NoteAccidental::Flat => "b",
            NoteAccidental::QuarterFlat => "d",
            NoteAccidental::Natural => "n",
            NoteAccidental::QuarterSharp => "t",
            NoteAccidental::Sharp => "#",
            NoteAccidental::ThreeQuarterSharp => "t#",
            NoteAccidental::DoubleSharp => "x",
        }
    }

    /// Offset from the natural pitch, in quarter tones
    pub fn quarter_tones(self) -> i8 {
        match self {
            NoteAccidental::DoubleFlat => -4,
            NoteAccidental::ThreeQuarterFlat => -3,
            NoteAccidental::Flat => -2,
            NoteAccidental::QuarterFlat => -1,
            NoteAccidental::Natural => 0,
            NoteAccidental::QuarterSharp => 1,
            NoteAccidental::Sharp => 2,
            NoteAccidental::ThreeQuarterSharp => 3,
            NoteAccidental::DoubleSharp => 4,
        }
    }
}

/// Octave number from -1 to 9; middle C is in octave 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Octave(i8);

impl Octave {
    pub const LOWEST: Octave = Octave(-1);
    pub const HIGHEST: Octave = Octave(9);
    pub const MIDDLE: Octave = Octave(4);

    pub fn new(number: i8) -> Option<Self> {
        (Self::LOWEST.0..=Self::HIGHEST.0)
            .contains(&number)
            .then_some(Octave(number))
    }

    pub fn number(self) -> i8 {
        self.0
    }

    pub fn raise(self) -> Option<Self> {
        Octave::new(self.0 + 1)
    }

    pub fn lower(self) -> Option<Self> {
        Octave::new(self.0 - 1)
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "-" => Some(Self::LOWEST),
            digit => Octave::new(digit.parse().ok()?),
        }
    }
}

impl fmt::Display for Octave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Pitch {
    pub name: PitchName,
    /// `None` takes the accidental from the key signature
    pub accidental: Option<NoteAccidental>,
    pub octave: Octave,
}

const DIATONIC: [PitchName; 7] = [
    PitchName::C,
    PitchName::D,
    PitchName::E,
    PitchName::F,
    PitchName::G,
    PitchName::A,
    PitchName::B,
];

fn diatonic_index(name: PitchName) -> usize {
    match name {
        PitchName::C => 0,
        PitchName::D => 1,
        PitchName::E => 2,
        PitchName::F => 3,
        PitchName::G => 4,
        PitchName::A => 5,
        PitchName::B => 6,
    }
}

impl Pitch {
    pub fn new(name: PitchName, octave: Octave) -> Self {
        Pitch {
            name,
            accidental: None,
            octave,
        }
    }

    pub fn with_accidental(mut self, accidental: NoteAccidental) -> Self {
        self.accidental = Some(accidental);
        self
    }

    /// Staff steps above middle C, negative below it
    pub fn steps_from_middle_c(self) -> i32 {
        let octaves = i32::from(self.octave.number() - Octave::MIDDLE.number());
        diatonic_index(self.name) as i32 + octaves * 7
    }

    /// One staff step up, keeping the accidental; `None` above the range
    pub fn step_up(self) -> Option<Self> {
        let index = diatonic_index(self.name);
        let octave = if index == 6 { self.octave.raise()? } else { self.octave };
        Some(Pitch {
            name: DIATONIC[(index + 1) % 7],
            octave,
            ..self
        })
    }

    /// One staff step down, keeping the accidental; `None` below the range
    pub fn step_down(self) -> Option<Self> {
        let index = diatonic_index(self.name);
        let octave = if index == 0 { self.octave.lower()? } else { self.octave };
        Some(Pitch {
            name: DIATONIC[(index + 6) % 7],
            octave,
            ..self
        })
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.letter())?;
        if let Some(accidental) = self.accidental {
            write!(f, "{}", accidental.symbol())?;
        }
        write!(f, "{}", self.octave)
    }
}

/// How a note is attacked and released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Articulation {
    Marcato,
    Accent,
    Staccato,
    Staccatissimo,
    Tenuto,
    TenutoStaccato,
    MarcatoStaccato,
    MarcatoTenuto,
    AccentStaccato,
    AccentTenuto,
}

impl Articulation {
    fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "^" => Articulation::Marcato,
            ">" => Articulation::Accent,
            "." => Articulation::Staccato,
            "'" => Articulation::Staccatissimo,
            "_" => Articulation::Tenuto,
            "_." => Articulation::TenutoStaccato,
            "^." => Articulation::MarcatoStaccato,
            "^_" => Articulation::MarcatoTenuto,
            ">." => Articulation::AccentStaccato,
            ">_" => Articulation::AccentTenuto,
            _ => return None,
        })
    }

    fn symbol(self) -> &'static str {
        match self {
            Articulation::Marcato => "^",
            Articulation::Accent => ">",
            Articulation::Staccato => ".",
            Articulation::Staccatissimo => "'",
            Articulation::Tenuto => "_",
            Articulation::TenutoStaccato => "_.",
            Articulation::MarcatoStaccato => "^.",
            Articulation::MarcatoTenuto => "^_",
            Articulation::AccentStaccato => ">.",
            Articulation::AccentTenuto => ">_",
        }
    }
}

/// A note or a rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Note {
    pub duration: Duration,
    /// `None` is a rest
    pub pitch: Option<Pitch>,
    /// Only written for pitched notes
    pub articulation: Option<Articulation>,
}

impl Note {
    pub fn rest(duration: impl Into<Duration>) -> Self {
        Note {
            duration: duration.into(),
            pitch: None,
            articulation: None,
        }
    }

    pub fn pitched(duration: impl Into<Duration>, pitch: Pitch) -> Self {
        Note {
            duration: duration.into(),
            pitch: Some(pitch),
            articulation: None,
        }
    }

    pub fn with_articulation(mut self, articulation: Articulation) -> Self {
        self.articulation = Some(articulation);
        self
    }

    pub fn is_rest(&self) -> bool {
        self.pitch.is_none()
    }

    pub fn length(&self) -> Fraction {
        self.duration.length()
    }

    /// Combined length of a run of notes, `None` on overflow
    pub fn total_length<'a, I: IntoIterator<Item = &'a Note>>(notes: I) -> Option<Fraction> {
        Fraction::checked_sum(notes.into_iter().map(Note::length))
    }
}

impl FromStr for Note {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = NOTE_RE
            .captures(s)
            .ok_or_else(|| format!("'{}' is not a note", s))?;
        let value = NoteValue::from_letter(&caps[1]).ok_or_else(|| format!("'{}' has no duration", s))?;
        let dots = u8::try_from(caps[2].len()).unwrap_or(u8::MAX);
        let duration = Duration::new(value, dots)
            .ok_or_else(|| format!("'{}': {:?} takes at most {} dot(s)", s, value, value.max_dots()))?;

        let pitch = match caps.get(3) {
            None => None,
            Some(name) => Some(Pitch {
                name: PitchName::from_letter(name.as_str()).ok_or_else(|| format!("'{}' has no pitch", s))?,
                accidental: caps.get(4).and_then(|m| NoteAccidental::from_symbol(m.as_str())),
                octave: caps
                    .get(5)
                    .and_then(|m| Octave::from_symbol(m.as_str()))
                    .ok_or_else(|| format!("'{}' has no octave", s))?,
            }),
        };

        Ok(Note {
            duration,
            pitch,
            articulation: caps.get(6).and_then(|m| Articulation::from_symbol(m.as_str())),
        })
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.duration.value.letter())?;
        for _ in 0..self.duration.dots {
            write!(f, ".")?;
        }
        match &self.pitch {
            None => write!(f, "R"),
            Some(pitch) => {
                write!(f, "{}", pitch)?;
                if let Some(articulation) = self.articulation {
                    write!(f, "{}", articulation.symbol())?;
                }
                Ok(())
            }
        }
    }
}
