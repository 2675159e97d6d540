use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::{LedgerError, Result};

/// calendar month, the billing and budgeting period unit.
/// parsed from and rendered as "YYYY-MM"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) || !(1..=9999).contains(&year) {
            return Err(LedgerError::InvalidMonth {
                input: format!("{year:04}-{month:02}"),
            });
        }
        Ok(Self { year, month })
    }

    /// month containing the given instant
    pub fn containing(date: DateTime<Utc>) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// advance by whole calendar months, rolling the year over
    pub fn plus_months(&self, count: u32) -> Self {
        let zero_based = self.month - 1 + count;
        Self {
            year: self.year + (zero_based / 12) as i32,
            month: zero_based % 12 + 1,
        }
    }

    /// first instant of the month, utc
    pub fn start(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(self.year, self.month, 1, 0, 0, 0)
            .single()
            .expect("month is validated at construction")
    }

    /// first instant of the following month, utc
    pub fn end_exclusive(&self) -> DateTime<Utc> {
        self.plus_months(1).start()
    }

    /// first calendar day
    pub fn first_day(&self) -> NaiveDate {
        self.start().date_naive()
    }

    /// last calendar day
    pub fn last_day(&self) -> NaiveDate {
        self.plus_months(1)
            .first_day()
            .pred_opt()
            .expect("month start is never the minimum date")
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// date at the given day of this month, clamped to the month's length
    pub fn date_clamped(&self, day: u8) -> NaiveDate {
        let day = (day as u32).min(self.days_in_month()).max(1);
        NaiveDate::from_ymd_opt(self.year, self.month, day)
            .expect("day is clamped to the month's length")
    }

    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        Month::containing(date) == *self
    }
}

/// advance an instant by whole calendar months, clamping the day
/// to the target month's length (jan 31 + 1 month = last day of feb)
pub fn add_months(date: DateTime<Utc>, count: u32) -> DateTime<Utc> {
    date.checked_add_months(Months::new(count)).unwrap_or(date)
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || LedgerError::InvalidMonth {
            input: s.to_string(),
        };

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Month::new(year, month).map_err(|_| invalid())
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
