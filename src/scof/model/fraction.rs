//! Exact lengths as fractions of a whole note
//!
//! Note durations and measure lengths are both measured in whole notes, so a
//! quarter note is `1/4` and a 6/8 measure is `3/4`. Values are always kept in
//! lowest terms, which makes equal lengths compare equal field by field.
//!
//! Arithmetic is checked the way integer arithmetic is: every operation returns
//! `None` instead of overflowing or going below zero.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Fraction {
    num: u32,
    den: u32,
}

impl Fraction {
    pub const ZERO: Fraction = Fraction { num: 0, den: 1 };
    pub const WHOLE: Fraction = Fraction { num: 1, den: 1 };

    /// `num/den` in lowest terms, `None` for a zero denominator
    pub fn new(num: u32, den: u32) -> Option<Self> {
        if den == 0 {
            return None;
        }
        Self::reduced(u64::from(num), u64::from(den))
    }

    /// `count / 2^halvings` in lowest terms; `halvings` is capped at 31
    pub fn dyadic(count: u32, halvings: u32) -> Self {
        let mut num = count;
        let mut exp = halvings.min(31);
        while exp > 0 && num % 2 == 0 && num != 0 {
            num /= 2;
            exp -= 1;
        }
        if num == 0 {
            return Fraction::ZERO;
        }
        Fraction { num, den: 1 << exp }
    }

    fn reduced(num: u64, den: u64) -> Option<Self> {
        let divisor = gcd(num, den);
        Some(Fraction {
            num: u32::try_from(num / divisor).ok()?,
            den: u32::try_from(den / divisor).ok()?,
        })
    }

    pub fn numerator(self) -> u32 {
        self.num
    }

    pub fn denominator(self) -> u32 {
        self.den
    }

    pub fn is_zero(self) -> bool {
        self.num == 0
    }

    /// `1 / self`, `None` for zero
    pub fn recip(self) -> Option<Self> {
        if self.num == 0 {
            None
        } else {
            Some(Fraction {
                num: self.den,
                den: self.num,
            })
        }
    }

    pub fn checked_add(self, other: Fraction) -> Option<Self> {
        let (a, b, den) = self.cross(other);
        Self::reduced(a.checked_add(b)?, den)
    }

    /// `None` when `other` is larger than `self`
    pub fn checked_sub(self, other: Fraction) -> Option<Self> {
        let (a, b, den) = self.cross(other);
        Self::reduced(a.checked_sub(b)?, den)
    }

    pub fn checked_mul(self, other: Fraction) -> Option<Self> {
        Self::reduced(
            u64::from(self.num) * u64::from(other.num),
            u64::from(self.den) * u64::from(other.den),
        )
    }

    pub fn checked_div(self, other: Fraction) -> Option<Self> {
        self.checked_mul(other.recip()?)
    }

    /// Total of a sequence of lengths
    pub fn checked_sum<I: IntoIterator<Item = Fraction>>(items: I) -> Option<Self> {
        items
            .into_iter()
            .try_fold(Fraction::ZERO, |total, item| total.checked_add(item))
    }

    // Numerators over the common denominator `self.den * other.den`
    fn cross(self, other: Fraction) -> (u64, u64, u64) {
        (
            u64::from(self.num) * u64::from(other.den),
            u64::from(other.num) * u64::from(self.den),
            u64::from(self.den) * u64::from(other.den),
        )
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Fraction::ZERO
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.cross(*other);
        a.cmp(&b)
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for Fraction {
    type Err = String;

    /// `n/d` or a whole number `n`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num, den) = s.split_once('/').unwrap_or((s, "1"));
        let part = |text: &str| {
            text.parse::<u32>()
                .map_err(|e| format!("'{}' in fraction '{}': {}", text, s, e))
        };
        Fraction::new(part(num)?, part(den)?).ok_or_else(|| format!("fraction '{}' has a zero denominator", s))
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a.max(1)
}
