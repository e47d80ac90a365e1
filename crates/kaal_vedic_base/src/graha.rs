//! Vedic planet (graha) enum.
//!
//! The 9 grahas are the lords of every Vimshottari period. Backends and
//! users name them either in Sanskrit or in English, so both spellings
//! parse.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VedicError;

/// The 9 Vedic grahas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Graha {
    Surya,
    Chandra,
    Mangal,
    Buddh,
    Guru,
    Shukra,
    Shani,
    Rahu,
    Ketu,
}

/// All 9 grahas in traditional order.
pub const ALL_GRAHAS: [Graha; 9] = [
    Graha::Surya,
    Graha::Chandra,
    Graha::Mangal,
    Graha::Buddh,
    Graha::Guru,
    Graha::Shukra,
    Graha::Shani,
    Graha::Rahu,
    Graha::Ketu,
];

impl Graha {
    /// Sanskrit name of the graha.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Surya => "Surya",
            Self::Chandra => "Chandra",
            Self::Mangal => "Mangal",
            Self::Buddh => "Buddh",
            Self::Guru => "Guru",
            Self::Shukra => "Shukra",
            Self::Shani => "Shani",
            Self::Rahu => "Rahu",
            Self::Ketu => "Ketu",
        }
    }

    /// English name of the graha.
    pub const fn english_name(self) -> &'static str {
        match self {
            Self::Surya => "Sun",
            Self::Chandra => "Moon",
            Self::Mangal => "Mars",
            Self::Buddh => "Mercury",
            Self::Guru => "Jupiter",
            Self::Shukra => "Venus",
            Self::Shani => "Saturn",
            Self::Rahu => "Rahu",
            Self::Ketu => "Ketu",
        }
    }

    /// 0-based index into ALL_GRAHAS.
    pub const fn index(self) -> u8 {
        match self {
            Self::Surya => 0,
            Self::Chandra => 1,
            Self::Mangal => 2,
            Self::Buddh => 3,
            Self::Guru => 4,
            Self::Shukra => 5,
            Self::Shani => 6,
            Self::Rahu => 7,
            Self::Ketu => 8,
        }
    }

    /// Inverse of [`Graha::index`].
    pub fn from_index(index: u8) -> Option<Self> {
        ALL_GRAHAS.get(index as usize).copied()
    }
}

impl FromStr for Graha {
    type Err = VedicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let graha = match lower.as_str() {
            "sun" | "surya" | "ravi" => Self::Surya,
            "moon" | "chandra" | "soma" => Self::Chandra,
            "mars" | "mangal" | "mangala" | "kuja" => Self::Mangal,
            "mercury" | "buddh" | "budha" => Self::Buddh,
            "jupiter" | "guru" | "brihaspati" => Self::Guru,
            "venus" | "shukra" | "sukra" => Self::Shukra,
            "saturn" | "shani" | "sani" => Self::Shani,
            "rahu" | "north node" => Self::Rahu,
            "ketu" | "south node" => Self::Ketu,
            _ => return Err(VedicError::UnknownGraha(s.to_string())),
        };
        Ok(graha)
    }
}

impl TryFrom<String> for Graha {
    type Error = VedicError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Graha> for String {
    fn from(g: Graha) -> Self {
        g.english_name().to_string()
    }
}

impl Display for Graha {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.english_name())
    }
}
