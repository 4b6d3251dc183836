//! `YYYYDDD` ordinal dates as used in the first column of ICASA/DSSAT weather files.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrdinalError {
    #[error("invalid yyyyddd format ({0})")]
    Format(String),

    #[error("invalid year ({0})")]
    Year(i32),

    #[error("invalid day of year ({0})")]
    DayOfYear(u32),

    #[error("day 366 in non-leap year {0}")]
    LeapDay(i32),
}

/// What to do with day-of-year 366 in a year that only has 365 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeapDayPolicy {
    /// Count forward from January 1st, landing on January 1st of the next year.
    #[default]
    RollOver,
    /// Drop the line with a warning.
    Reject,
}

/// A parsed `YYYYDDD` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdinalDate {
    pub year: i32,
    pub day_of_year: u32,
}

impl OrdinalDate {
    /// Parses exactly seven ASCII digits. The year must be positive and the day
    /// of year within `1..=366`.
    ///
    /// ```
    /// use nasa_power_sync::OrdinalDate;
    ///
    /// let date = OrdinalDate::parse("2001032").unwrap();
    /// assert_eq!((date.year, date.day_of_year), (2001, 32));
    /// assert!(OrdinalDate::parse("20011").is_err());
    /// ```
    pub fn parse(token: &str) -> Result<Self, OrdinalError> {
        if token.len() != 7 || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OrdinalError::Format(token.to_string()));
        }
        // Seven ASCII digits always fit both integer types.
        let year: i32 = token[..4]
            .parse()
            .map_err(|_| OrdinalError::Format(token.to_string()))?;
        let day_of_year: u32 = token[4..]
            .parse()
            .map_err(|_| OrdinalError::Format(token.to_string()))?;

        if year <= 0 {
            return Err(OrdinalError::Year(year));
        }
        if !(1..=366).contains(&day_of_year) {
            return Err(OrdinalError::DayOfYear(day_of_year));
        }
        Ok(Self { year, day_of_year })
    }

    /// Converts to a proleptic Gregorian calendar date.
    pub fn to_calendar(self, policy: LeapDayPolicy) -> Result<NaiveDate, OrdinalError> {
        if let Some(date) = NaiveDate::from_yo_opt(self.year, self.day_of_year) {
            return Ok(date);
        }
        match policy {
            LeapDayPolicy::Reject => Err(OrdinalError::LeapDay(self.year)),
            LeapDayPolicy::RollOver => NaiveDate::from_ymd_opt(self.year, 1, 1)
                .and_then(|jan1| jan1.checked_add_days(Days::new(u64::from(self.day_of_year) - 1)))
                .ok_or(OrdinalError::Year(self.year)),
        }
    }
}

/// Formats a date as the 8-digit `YYYYMMDD` key used by the humidity map.
pub fn date_key(date: NaiveDate) -> String {
    format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
}
