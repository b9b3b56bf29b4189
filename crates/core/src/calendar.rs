//! Calendar-day arithmetic in a fixed UTC offset.

use crate::constants::DAY_DISPLAY_FORMAT;
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// Maps instants onto calendar days as seen from one UTC offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The calendar day `at` falls on.
    pub fn day_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// Whole calendar days from `from` to `to`; negative when `to` is on an earlier day.
    ///
    /// Time of day is ignored, so two instants on the same calendar day are 0 days apart.
    pub fn days_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
        (self.day_of(to) - self.day_of(from)).num_days()
    }

    pub fn display_day(&self, at: DateTime<Utc>) -> String {
        self.day_of(at).format(DAY_DISPLAY_FORMAT).to_string()
    }
}
