//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the core. The core
//! never reads environment variables itself, which keeps calendar arithmetic deterministic in
//! tests and across threads.

use crate::calendar::Calendar;
use crate::{CoreError, CoreResult};
use chrono::{FixedOffset, Offset, Utc};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    calendar_offset: FixedOffset,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `calendar_offset` decides where calendar days start and end for due dates and tooth
    /// entry grouping.
    pub fn new(calendar_offset: FixedOffset) -> Self {
        Self { calendar_offset }
    }

    pub fn calendar_offset(&self) -> FixedOffset {
        self.calendar_offset
    }

    pub fn calendar(&self) -> Calendar {
        Calendar::new(self.calendar_offset)
    }
}

/// Parse a UTC offset from an optional string value.
///
/// Accepts `Z`, `UTC`, `+HH`, `+HH:MM` and `+HHMM` (and the `-` forms). If `value` is `None`
/// or empty/whitespace, returns UTC.
///
/// # Errors
///
/// Returns [`CoreError::InvalidInput`] if the value is not a recognised offset or is outside
/// ±23:59.
pub fn utc_offset_from_env_value(value: Option<String>) -> CoreResult<FixedOffset> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(value) = value else {
        return Ok(Utc.fix());
    };

    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    let invalid = || {
        CoreError::InvalidInput(format!(
            "UTC offset must look like +HH:MM or -HH:MM, got: '{}'",
            value
        ))
    };

    let (sign, rest) = match value.as_bytes().first() {
        Some(b'+') => (1, &value[1..]),
        Some(b'-') => (-1, &value[1..]),
        _ => return Err(invalid()),
    };
    if !rest.is_ascii() {
        return Err(invalid());
    }

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };

    if hours.is_empty() || !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_offset_is_utc() {
        assert_eq!(utc_offset_from_env_value(None).unwrap().local_minus_utc(), 0);
        assert_eq!(
            utc_offset_from_env_value(Some("   ".into()))
                .unwrap()
                .local_minus_utc(),
            0
        );
        assert_eq!(
            utc_offset_from_env_value(Some("Z".into()))
                .unwrap()
                .local_minus_utc(),
            0
        );
    }

    #[test]
    fn parses_signed_offsets() {
        let plus = utc_offset_from_env_value(Some("+02:00".into())).unwrap();
        assert_eq!(plus.local_minus_utc(), 7200);

        let minus = utc_offset_from_env_value(Some("-0530".into())).unwrap();
        assert_eq!(minus.local_minus_utc(), -(5 * 3600 + 30 * 60));

        let hours_only = utc_offset_from_env_value(Some("+9".into())).unwrap();
        assert_eq!(hours_only.local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn rejects_malformed_offsets() {
        for bad in ["02:00", "+24:00", "+02:60", "+ab:cd", "+", "+1é1", "-é:00"] {
            let err = utc_offset_from_env_value(Some(bad.into())).unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidInput(_)),
                "expected InvalidInput for {bad}"
            );
        }
    }

    #[test]
    fn config_exposes_calendar_for_offset() {
        let offset = utc_offset_from_env_value(Some("+10:00".into())).unwrap();
        let cfg = CoreConfig::new(offset);
        assert_eq!(cfg.calendar().offset(), offset);
        assert_eq!(CoreConfig::default().calendar_offset().local_minus_utc(), 0);
    }
}
