//! Repeat and navigation marks
//!
//! Marks belong to the measure line they are written on and are not carried
//! forward. Their text forms are single words so they sit after the other
//! measure arguments:
//!
//! ```text
//! M ||:            start of a repeated passage
//! M :|| 2.         end of it, second ending
//! M segno          D.S. jumps back here
//! M D.C.           jump back to the beginning
//! M D.S.           jump back to the segno
//! M to-coda        jump forward to the coda
//! M coda           the coda starts here
//! M fine           stop here after a jump back
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    /// `||:`
    Open,
    /// `:||`
    Close,
    Segno,
    /// Da capo, back to the beginning
    DaCapo,
    /// Dal segno, back to the sign
    DalSegno,
    Coda,
    ToCoda,
    Fine,
    /// Numbered ending, counting from 1
    Ending(u8),
}

impl Repeat {
    /// Check whether a word is a repeat mark
    pub fn matches(word: &str) -> bool {
        word.parse::<Repeat>().is_ok()
    }
}

impl FromStr for Repeat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "||:" => Repeat::Open,
            ":||" => Repeat::Close,
            "segno" => Repeat::Segno,
            "D.C." => Repeat::DaCapo,
            "D.S." => Repeat::DalSegno,
            "coda" => Repeat::Coda,
            "to-coda" => Repeat::ToCoda,
            "fine" => Repeat::Fine,
            _ => {
                let number = s
                    .strip_suffix('.')
                    .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
                    .ok_or_else(|| format!("'{}' is not a repeat mark", s))?;
                match number.parse::<u8>() {
                    Ok(0) => return Err(format!("ending '{}' must count from 1", s)),
                    Ok(n) => Repeat::Ending(n),
                    Err(e) => return Err(format!("ending '{}': {}", s, e)),
                }
            }
        })
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repeat::Open => write!(f, "||:"),
            Repeat::Close => write!(f, ":||"),
            Repeat::Segno => write!(f, "segno"),
            Repeat::DaCapo => write!(f, "D.C."),
            Repeat::DalSegno => write!(f, "D.S."),
            Repeat::Coda => write!(f, "coda"),
            Repeat::ToCoda => write!(f, "to-coda"),
            Repeat::Fine => write!(f, "fine"),
            Repeat::Ending(n) => write!(f, "{}.", n),
        }
    }
}
