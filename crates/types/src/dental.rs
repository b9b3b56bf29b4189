//! Dental classification vocabularies.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A tooth in the universal numbering system (1 to 32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct ToothNumber(u8);

impl ToothNumber {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 32;

    /// Validates `value` against the universal numbering range.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::ToothNumberOutOfRange`] for anything outside `1..=32`.
    pub fn new(value: i64) -> Result<Self, TypesError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(TypesError::ToothNumberOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for ToothNumber {
    type Error = TypesError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ToothNumber> for u8 {
    fn from(value: ToothNumber) -> Self {
        value.0
    }
}

impl fmt::Display for ToothNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A photo quality rating in whole stars.
///
/// New captures start at [`Rating::UNRATED`]. Values outside `0..=5` cannot be constructed,
/// so an out-of-range rating is rejected where it enters the system rather than clamped.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const UNRATED: Rating = Rating(0);
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, TypesError> {
        if (0..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(TypesError::RatingOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = TypesError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Treatment stage a photo documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Preparation,
    Restoration,
}

impl Stage {
    pub const ALL: [Stage; 2] = [Stage::Preparation, Stage::Restoration];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Preparation => "Preparation",
            Stage::Restoration => "Restoration",
        }
    }

    /// Short label used in tag summaries.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Stage::Preparation => "Prep",
            Stage::Restoration => "Resto",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Stage::ALL
            .into_iter()
            .find(|stage| {
                stage.as_str().eq_ignore_ascii_case(trimmed)
                    || stage.abbreviation().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| TypesError::UnknownStage(trimmed.to_string()))
    }
}

/// Camera angle vocabulary for clinical photographs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Angle {
    Occlusal,
    #[serde(rename = "Buccal/Facial")]
    BuccalFacial,
    #[serde(rename = "Lingual/Palatal")]
    LingualPalatal,
    Mesial,
    Distal,
    Incisal,
    Overview,
}

impl Angle {
    pub const ALL: [Angle; 7] = [
        Angle::Occlusal,
        Angle::BuccalFacial,
        Angle::LingualPalatal,
        Angle::Mesial,
        Angle::Distal,
        Angle::Incisal,
        Angle::Overview,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Angle::Occlusal => "Occlusal",
            Angle::BuccalFacial => "Buccal/Facial",
            Angle::LingualPalatal => "Lingual/Palatal",
            Angle::Mesial => "Mesial",
            Angle::Distal => "Distal",
            Angle::Incisal => "Incisal",
            Angle::Overview => "Overview",
        }
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Angle {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Angle::ALL
            .into_iter()
            .find(|angle| angle.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TypesError::UnknownAngle(trimmed.to_string()))
    }
}
