//! Date parsing and calendar feature derivation
//!
//! A draw's date is parsed exactly once per row ([`parse_date`]); every
//! calendar feature is then derived from that single [`NaiveDate`]
//! ([`CalendarFields::from_date`]).
//!
//! # Conventions
//!
//! - `day_of_week`: ISO order, **0 = Monday** through 6 = Sunday
//! - `day_of_year`: 1-based ordinal day (1..=365, or 1..=366 in leap years)
//!
//! # Examples
//!
//! ```
//! use drawstat_analysis::calendar::{parse_date, CalendarFields};
//!
//! let date = parse_date("01.03.2024", "%d.%m.%Y").unwrap();
//! let fields = CalendarFields::from_date(date);
//! assert_eq!(fields.day_of_year, 61);
//! assert_eq!(fields.day_of_week, 4); // Friday
//! ```

use chrono::{Datelike as _, NaiveDate};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("date '{input}' does not match format '{format}'")]
pub struct DateParseError {
    pub input: String,
    pub format: String,
}

/// Parses `raw` with a `chrono` strftime `format`.
pub fn parse_date(raw: &str, format: &str) -> Result<NaiveDate, DateParseError> {
    NaiveDate::parse_from_str(raw.trim(), format).map_err(|_| DateParseError {
        input: raw.to_owned(),
        format: format.to_owned(),
    })
}

/// A calendar-derived column of the enriched table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarField {
    Year,
    Month,
    Day,
    DayOfWeek,
    DayOfYear,
}

impl CalendarField {
    pub const ALL: [CalendarField; 5] = [
        CalendarField::Year,
        CalendarField::Month,
        CalendarField::Day,
        CalendarField::DayOfWeek,
        CalendarField::DayOfYear,
    ];

    #[must_use]
    pub fn column_name(self) -> &'static str {
        match self {
            CalendarField::Year => "year",
            CalendarField::Month => "month",
            CalendarField::Day => "day",
            CalendarField::DayOfWeek => "day_of_week",
            CalendarField::DayOfYear => "day_of_year",
        }
    }
}

/// Calendar features of one draw date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// 0 = Monday .. 6 = Sunday
    pub day_of_week: u32,
    /// 1-based ordinal day within the year
    pub day_of_year: u32,
}

impl CalendarFields {
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            day_of_week: date.weekday().num_days_from_monday(),
            day_of_year: date.ordinal(),
        }
    }

    #[must_use]
    pub fn get(&self, field: CalendarField) -> i64 {
        match field {
            CalendarField::Year => i64::from(self.year),
            CalendarField::Month => i64::from(self.month),
            CalendarField::Day => i64::from(self.day),
            CalendarField::DayOfWeek => i64::from(self.day_of_week),
            CalendarField::DayOfYear => i64::from(self.day_of_year),
        }
    }
}

/// Derives the five calendar features of `date`.
#[must_use]
pub fn derive_calendar_fields(date: NaiveDate) -> CalendarFields {
    CalendarFields::from_date(date)
}
