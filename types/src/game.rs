use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// A face value outside `1..=6`.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("die face must be between 1 and 6 (got {0})")]
pub struct InvalidDie(pub u8);

/// A single die face, guaranteed to be in `1..=6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Die(u8);

impl Die {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub fn new(face: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&face).then_some(Self(face))
    }

    /// Map any offset onto a face (`0 -> 1`, `5 -> 6`, wrapping).
    pub fn from_offset(offset: u8) -> Self {
        Self(offset % Self::MAX + Self::MIN)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Die {
    type Error = InvalidDie;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Die::new(value).ok_or(InvalidDie(value))
    }
}

impl From<Die> for u8 {
    fn from(die: Die) -> Self {
        die.0
    }
}

/// The three dice of one round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dice(pub [Die; 3]);

impl Dice {
    /// Build dice from raw faces, rejecting anything outside `1..=6`.
    pub fn new(d1: u8, d2: u8, d3: u8) -> Result<Self, InvalidDie> {
        Ok(Self([d1.try_into()?, d2.try_into()?, d3.try_into()?]))
    }

    pub fn faces(&self) -> [u8; 3] {
        [self.0[0].value(), self.0[1].value(), self.0[2].value()]
    }

    pub fn total(&self) -> u8 {
        self.faces().iter().sum()
    }

    pub fn is_triple(&self) -> bool {
        self.0[0] == self.0[1] && self.0[1] == self.0[2]
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.faces();
        write!(f, "{a}-{b}-{c}")
    }
}

/// A side the player can bet on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Xỉu: totals 4-10
    #[serde(rename = "xiu")]
    Low,
    /// Tài: totals 11-17
    #[serde(rename = "tai")]
    High,
}

impl Side {
    /// Side a total falls on when triples are ignored.
    pub fn for_total(total: u8) -> Self {
        if total <= 10 {
            Side::Low
        } else {
            Side::High
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Low => "XỈU",
            Side::High => "TÀI",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown side: {0} (expected tai/high or xiu/low)")]
pub struct ParseSideError(pub String);

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xiu" | "xỉu" | "low" | "x" => Ok(Side::Low),
            "tai" | "tài" | "high" | "t" => Ok(Side::High),
            other => Err(ParseSideError(other.to_string())),
        }
    }
}

/// Category of a rolled round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "xiu")]
    Low,
    #[serde(rename = "tai")]
    High,
    #[serde(rename = "triple")]
    Triple,
}

impl Outcome {
    /// The bettable side matching this outcome, if any.
    pub fn side(self) -> Option<Side> {
        match self {
            Outcome::Low => Some(Side::Low),
            Outcome::High => Some(Side::High),
            Outcome::Triple => None,
        }
    }

    /// One-letter marker used by the history strip.
    pub fn marker(self) -> char {
        match self {
            Outcome::Low => 'X',
            Outcome::High => 'T',
            Outcome::Triple => 'B',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Outcome::Low => "XỈU",
            Outcome::High => "TÀI",
            Outcome::Triple => "BÃO",
        }
    }
}

impl From<Side> for Outcome {
    fn from(side: Side) -> Self {
        match side {
            Side::Low => Outcome::Low,
            Side::High => Outcome::High,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A placed wager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    pub side: Side,
    pub stake: u64,
}
