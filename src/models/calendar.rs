//! Date helpers.
//!
//! The engine only needs one calendar fact: the weekday of the absence
//! date, numbered 1 = Monday through 7 = Sunday. Holidays and term
//! boundaries are not modelled.

use chrono::{Datelike, NaiveDate};

use crate::error::{Result, SubstituteError};

/// Monday as stored on schedule entries.
pub const MONDAY: u8 = 1;
/// Friday as stored on schedule entries.
pub const FRIDAY: u8 = 5;
/// Sunday, the largest accepted day number.
pub const SUNDAY: u8 = 7;

/// Weekday number of a date (1 = Monday … 7 = Sunday).
pub fn weekday_of(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

/// Whether the date falls on a regular teaching day (Monday–Friday).
pub fn is_school_day(date: NaiveDate) -> bool {
    (MONDAY..=FRIDAY).contains(&weekday_of(date))
}

/// Parses an ISO `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| SubstituteError::InvalidInput(format!("invalid date '{s}': {e}")))
}
