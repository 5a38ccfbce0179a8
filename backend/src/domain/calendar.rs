//! Calendar arithmetic for monthly schedules.
//!
//! Months arrive from clients either as a name (`"February"`, `"feb"`) or as
//! an index (`"2"`, `2`). Everything downstream works with [`Month`] and the
//! ordered day numbers `1..=N` of the month.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::SchedulingError;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Resolve a month from its 1-based index.
    ///
    /// # Examples
    /// ```
    /// use rota::domain::Month;
    ///
    /// assert_eq!(Month::from_index(2).unwrap(), Month::February);
    /// assert!(Month::from_index(13).is_err());
    /// ```
    pub fn from_index(index: u32) -> Result<Self, SchedulingError> {
        index
            .checked_sub(1)
            .and_then(|zero_based| Self::ALL.get(zero_based as usize).copied())
            .ok_or_else(|| SchedulingError::InvalidMonth {
                value: index.to_string(),
            })
    }

    /// 1-based month number.
    pub const fn number(self) -> u32 {
        self as u32 + 1
    }

    /// English month name.
    pub fn name(self) -> &'static str {
        MONTH_NAMES[self as usize]
    }

    /// Number of days in this month for `year`.
    pub const fn days_in(self, year: i32) -> u32 {
        match self {
            Month::February if is_leap_year(year) => 29,
            Month::February => 28,
            Month::April | Month::June | Month::September | Month::November => 30,
            _ => 31,
        }
    }
}

impl FromStr for Month {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<u32>() {
            return Self::from_index(index);
        }
        let lower = trimmed.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|month| {
                let name = month.name().to_ascii_lowercase();
                lower == name || (lower.len() == 3 && name.starts_with(lower.as_str()))
            })
            .ok_or_else(|| SchedulingError::InvalidMonth {
                value: s.to_owned(),
            })
    }
}

impl TryFrom<u32> for Month {
    type Error = SchedulingError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_index(value)
    }
}

impl From<Month> for u32 {
    fn from(value: Month) -> Self {
        value.number()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gregorian leap-year rule.
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Ordered day numbers `1..=N` of the given month.
///
/// # Examples
/// ```
/// use rota::domain::month_days;
///
/// assert_eq!(month_days("February", 2024).unwrap().len(), 29);
/// assert_eq!(month_days("2", 2023).unwrap().len(), 28);
/// assert!(month_days("Smarch", 2024).is_err());
/// ```
pub fn month_days(month: &str, year: i32) -> Result<Vec<u32>, SchedulingError> {
    let month = month.parse::<Month>()?;
    Ok(days_of(month, year))
}

/// Ordered day numbers `1..=N` of an already-parsed month.
pub fn days_of(month: Month, year: i32) -> Vec<u32> {
    (1..=month.days_in(year)).collect()
}

/// Resolve the date of `day` within the month, if it exists.
pub fn date_of(month: Month, year: i32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month.number(), day)
}

/// One day of a monthly calendar with its weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub day: u32,
    pub date: NaiveDate,
}

impl CalendarDay {
    /// Day of the week.
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Whether the day falls on Saturday or Sunday.
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

/// Dated view of a month, used by roster rendering.
pub fn calendar_days(month: Month, year: i32) -> Result<Vec<CalendarDay>, SchedulingError> {
    let out_of_range = || SchedulingError::validation("year", format!("{year} is out of range"));
    days_of(month, year)
        .into_iter()
        .map(|day| {
            date_of(month, year, day)
                .map(|date| CalendarDay { day, date })
                .ok_or_else(out_of_range)
        })
        .collect()
}
