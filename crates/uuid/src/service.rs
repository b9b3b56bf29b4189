//! Internal implementation of photo identifiers.

use crate::{UuidError, UuidResult};
use chrono::{DateTime, Duration, Utc};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Canonical photo identifier (32 lowercase hex characters, no hyphens).
///
/// Once you have a `PhotoId`, you can safely assume the internal UUID is valid and renders in
/// canonical form.
///
/// # Construction
/// - [`PhotoId::new`] generates a fresh identifier for a new capture.
/// - [`PhotoId::parse`] validates an externally supplied identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhotoId(Uuid);

impl Default for PhotoId {
    fn default() -> Self {
        Self::new()
    }
}

impl PhotoId {
    /// Generates a new random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be in canonical form.
    ///
    /// This does **not** normalise other common UUID forms (for example, hyphenated or
    /// uppercase).
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "photo id must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(format!("invalid photo id '{}': {}", input, e)))
    }

    /// Returns the identifier as a `uuid::Uuid`.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true if `input` is in canonical form.
    ///
    /// This is a purely syntactic check: exactly 32 bytes, lowercase hex only.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl From<Uuid> for PhotoId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for PhotoId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhotoId::parse(s)
    }
}

impl serde::Serialize for PhotoId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for PhotoId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PhotoId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A capture timestamp paired with the identity of the photo taken at that instant.
///
/// # Monotonicity Guarantee
///
/// When calling [`CaptureStamp::generate`] with the previous stamp of the same session, the
/// timestamp is guaranteed to be strictly greater than the previous one (incremented by 1ms if
/// the clock has not advanced). Capture order and timestamp order therefore always agree,
/// which the fulfilment engine relies on when it assigns photos to slots.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CaptureStamp {
    timestamp: DateTime<Utc>,
    id: PhotoId,
}

impl CaptureStamp {
    /// Generate a new stamp, strictly later than `last` when one is given.
    pub fn generate(last: Option<&CaptureStamp>) -> Self {
        Self::generate_at(Utc::now(), last)
    }

    /// Generate a new stamp using `now` as the clock reading.
    pub fn generate_at(now: DateTime<Utc>, last: Option<&CaptureStamp>) -> Self {
        let timestamp = match last {
            Some(prev) if now <= prev.timestamp => prev.timestamp + Duration::milliseconds(1),
            _ => now,
        };

        Self {
            timestamp,
            id: PhotoId::new(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn id(&self) -> PhotoId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_generates_canonical_id() {
        let id = PhotoId::new();
        let canonical = id.to_string();

        assert_eq!(canonical.len(), 32);
        assert!(PhotoId::is_canonical(&canonical));
    }

    #[test]
    fn parse_accepts_canonical_id() {
        let canonical = "550e8400e29b41d4a716446655440000";
        let id = PhotoId::parse(canonical).unwrap();

        assert_eq!(id.to_string(), canonical);
    }

    #[test]
    fn parse_rejects_hyphenated_id() {
        let result = PhotoId::parse("550e8400-e29b-41d4-a716-446655440000");

        match result {
            Err(UuidError::InvalidInput(msg)) => {
                assert!(msg.contains("32 lowercase hex characters"));
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn parse_rejects_uppercase_and_bad_lengths() {
        assert!(PhotoId::parse("550E8400E29B41D4A716446655440000").is_err());
        assert!(PhotoId::parse("550e8400e29b41d4a71644665544000").is_err());
        assert!(PhotoId::parse("550e8400e29b41d4a7164466554400000").is_err());
        assert!(PhotoId::parse("550e8400e29b41d4a716446655440zzz").is_err());
        assert!(PhotoId::parse("").is_err());
    }

    #[test]
    fn serde_uses_canonical_form() {
        let id = PhotoId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"550e8400e29b41d4a716446655440000\"");

        let hyphenated = "\"550e8400-e29b-41d4-a716-446655440000\"";
        assert!(serde_json::from_str::<PhotoId>(hyphenated).is_err());
    }

    #[test]
    fn stamp_is_strictly_later_than_previous_at_same_instant() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap();
        let first = CaptureStamp::generate_at(now, None);
        let second = CaptureStamp::generate_at(now, Some(&first));

        assert_eq!(first.timestamp(), now);
        assert_eq!(second.timestamp(), now + Duration::milliseconds(1));
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn stamp_keeps_clock_reading_when_clock_advanced() {
        let earlier = Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap();
        let later = earlier + Duration::seconds(3);
        let first = CaptureStamp::generate_at(earlier, None);
        let second = CaptureStamp::generate_at(later, Some(&first));

        assert_eq!(second.timestamp(), later);
    }
}
