//! Constants used throughout the Dentfolio core crate.

/// Portfolios due within this many calendar days (inclusive) are "due soon".
pub const DUE_SOON_WINDOW_DAYS: i64 = 7;

/// Count applied to a requirement angle that has no explicit count.
pub const DEFAULT_ANGLE_COUNT: u32 = 1;

/// Summary shown for a tag selection with nothing set.
pub const EMPTY_TAG_SUMMARY: &str = "No tags selected";

/// Separator between fields of a tag summary.
pub const TAG_SUMMARY_SEPARATOR: &str = " · ";

/// Environment variable holding the UTC offset used for calendar-day arithmetic.
pub const UTC_OFFSET_ENV: &str = "DENTFOLIO_UTC_OFFSET";

/// Date format used when a calendar day is rendered for display or grouping.
pub const DAY_DISPLAY_FORMAT: &str = "%Y-%m-%d";
