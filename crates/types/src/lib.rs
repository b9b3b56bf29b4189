//! Validated value types shared across the Dentfolio crates.
//!
//! Every type here guarantees its invariant once constructed, so the capture session and the
//! fulfilment engine never need to re-check ranges or vocabularies.

mod dental;

pub use dental::{Angle, Rating, Stage, ToothNumber};

/// Errors that can occur when creating validated value types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypesError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// Tooth numbers use the universal numbering system (1 to 32).
    #[error("tooth number must be between 1 and 32, got {0}")]
    ToothNumberOutOfRange(i64),

    /// Ratings are whole stars from 0 to 5.
    #[error("rating must be between 0 and 5, got {0}")]
    RatingOutOfRange(i64),

    #[error("unknown stage: '{0}'")]
    UnknownStage(String),

    #[error("unknown angle: '{0}'")]
    UnknownAngle(String),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `TypesError::Empty` if the input is empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypesError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypesError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for NonEmptyText {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}
