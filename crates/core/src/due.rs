//! Portfolio due-date classification.
//!
//! Notification scheduling and list badges read [`DueStatus`]; the core only classifies and
//! never triggers alerts itself.

use crate::calendar::Calendar;
use crate::config::CoreConfig;
use crate::constants::DUE_SOON_WINDOW_DAYS;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// How close a portfolio is to its due date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    /// No due date is set.
    NoDueDate,
    /// The due date is on an earlier calendar day than today.
    Overdue,
    /// Due today or within the next seven calendar days.
    DueSoon,
    Upcoming,
}

impl DueStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DueStatus::NoDueDate => "no due date",
            DueStatus::Overdue => "overdue",
            DueStatus::DueSoon => "due soon",
            DueStatus::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pure, calendar-day based due-date arithmetic.
#[derive(Clone, Copy, Debug, Default)]
pub struct DueStatusCalculator {
    calendar: Calendar,
}

impl DueStatusCalculator {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            calendar: cfg.calendar(),
        }
    }

    pub fn with_calendar(calendar: Calendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Calendar days from `now` until `due`; today is 0 and yesterday is -1.
    pub fn days_until_due(&self, due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        self.calendar.days_between(now, due)
    }

    pub fn classify(&self, due: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DueStatus {
        let Some(due) = due else {
            return DueStatus::NoDueDate;
        };

        match self.days_until_due(due, now) {
            days if days < 0 => DueStatus::Overdue,
            days if days <= DUE_SOON_WINDOW_DAYS => DueStatus::DueSoon,
            _ => DueStatus::Upcoming,
        }
    }
}
