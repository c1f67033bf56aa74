//! Calendar months used to scope budgets and period-based summaries.

use std::fmt::Display;

use serde::Serialize;
use time::{Month, OffsetDateTime};
use time_tz::Tz;

use crate::{Error, timezone::offset_at};

/// A calendar month in a particular year.
///
/// Periods order chronologically: by year, then by month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Period {
    year: i32,
    month: u8,
}

impl Period {
    /// Create a period from a month number (1-12) and a four-digit year.
    ///
    /// # Errors
    /// Returns [Error::InvalidPeriod] if the month or year is out of range.
    pub fn new(month: u8, year: i32) -> Result<Self, Error> {
        if (1..=12).contains(&month) && (1000..=9999).contains(&year) {
            Ok(Self { year, month })
        } else {
            Err(Error::InvalidPeriod { month, year })
        }
    }

    /// Create a period without validation.
    ///
    /// The caller should ensure the month is in 1-12, e.g. because the values
    /// come from a database column with a check constraint.
    pub fn new_unchecked(month: u8, year: i32) -> Self {
        Self { year, month }
    }

    /// The period that `datetime` falls in when viewed in `tz`.
    ///
    /// The offset is the one `tz` observed at `datetime`, so daylight saving
    /// is applied per instant.
    pub fn containing(datetime: OffsetDateTime, tz: &Tz) -> Self {
        let local = datetime.to_offset(offset_at(tz, datetime));

        Self {
            year: local.year(),
            month: u8::from(local.month()),
        }
    }

    /// The period containing the current time in `tz`.
    pub fn current(tz: &Tz) -> Self {
        Self::containing(OffsetDateTime::now_utc(), tz)
    }

    /// The month number, 1-12.
    pub fn month(&self) -> u8 {
        self.month
    }

    /// The four-digit year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// A short label such as "Jan 2025".
    pub fn label(&self) -> String {
        let month = Month::try_from(self.month).unwrap_or(Month::January);
        let abbreviation = match month {
            Month::January => "Jan",
            Month::February => "Feb",
            Month::March => "Mar",
            Month::April => "Apr",
            Month::May => "May",
            Month::June => "Jun",
            Month::July => "Jul",
            Month::August => "Aug",
            Month::September => "Sep",
            Month::October => "Oct",
            Month::November => "Nov",
            Month::December => "Dec",
        };

        format!("{abbreviation} {}", self.year)
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
