//! Memory timestamp parsing and display formatting.
//!
//! # Responsibility
//! - Parse the store's fixed `YYYY-MM-DD HH-MM-SS` lexical form.
//! - Render the short card label used by every memory view.
//!
//! # Invariants
//! - Parsing splits fields explicitly; the `-` separator is shared by the
//!   date and time halves, so generic date parsers must not be used.
//! - Seconds are optional; hours and minutes are required.
//! - `display()` output is locale-independent (English short month names).

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Failure reasons for timestamp parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampParseError {
    /// Input is not `<date> <time>` with the expected field counts.
    Shape(String),
    /// A field is not a decimal number.
    NonNumeric { field: &'static str, value: String },
    /// Fields are numeric but do not describe a real calendar instant.
    OutOfRange(String),
}

impl Display for TimestampParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shape(raw) => write!(
                f,
                "timestamp `{raw}` does not match `YYYY-MM-DD HH-MM[-SS]`"
            ),
            Self::NonNumeric { field, value } => {
                write!(f, "timestamp field `{field}` is not numeric: `{value}`")
            }
            Self::OutOfRange(raw) => write!(f, "timestamp `{raw}` is out of range"),
        }
    }
}

impl Error for TimestampParseError {}

/// Parsed memory timestamp. Ordering follows chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemoryTimestamp(NaiveDateTime);

impl MemoryTimestamp {
    /// Parses `YYYY-MM-DD HH-MM-SS` (seconds optional).
    pub fn parse(raw: &str) -> Result<Self, TimestampParseError> {
        let trimmed = raw.trim();
        let shape_error = || TimestampParseError::Shape(trimmed.to_string());

        let (date_part, time_part) = trimmed.split_once(' ').ok_or_else(shape_error)?;
        let date_fields = date_part.split('-').collect::<Vec<_>>();
        let time_fields = time_part.trim().split('-').collect::<Vec<_>>();
        if date_fields.len() != 3 || !(2..=3).contains(&time_fields.len()) {
            return Err(shape_error());
        }

        let year = parse_field("year", date_fields[0])?;
        let month = parse_field("month", date_fields[1])?;
        let day = parse_field("day", date_fields[2])?;
        let hour = parse_field("hour", time_fields[0])?;
        let minute = parse_field("minute", time_fields[1])?;
        let second = match time_fields.get(2) {
            Some(value) => parse_field("second", value)?,
            None => 0,
        };

        let out_of_range = || TimestampParseError::OutOfRange(trimmed.to_string());
        let year = i32::try_from(year).map_err(|_| out_of_range())?;
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(out_of_range)?;
        let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(out_of_range)?;
        Ok(Self(NaiveDateTime::new(date, time)))
    }

    /// Builds a timestamp from an already validated date-time.
    pub fn from_naive(value: NaiveDateTime) -> Self {
        Self(value)
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    /// Renders the store's lexical form, e.g. `2025-02-16 06-33-16`.
    pub fn to_store_string(&self) -> String {
        self.0.format("%Y-%m-%d %H-%M-%S").to_string()
    }

    /// Renders the card label, e.g. `Feb 16 • 6:33am`.
    pub fn display(&self) -> String {
        let month = MONTH_ABBREVIATIONS[self.0.month0() as usize];
        let hour24 = self.0.hour();
        let meridiem = if hour24 >= 12 { "pm" } else { "am" };
        let hour12 = match hour24 % 12 {
            0 => 12,
            other => other,
        };
        format!(
            "{month} {} \u{2022} {hour12}:{:02}{meridiem}",
            self.0.day(),
            self.0.minute()
        )
    }
}

/// Returns the `YYYY-MM-DD` string used for "today" prefix comparison.
pub fn date_prefix(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_field(field: &'static str, value: &str) -> Result<u32, TimestampParseError> {
    let non_numeric = || TimestampParseError::NonNumeric {
        field,
        value: value.to_string(),
    };
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(non_numeric());
    }
    value.parse::<u32>().map_err(|_| non_numeric())
}
