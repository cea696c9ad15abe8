use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Calendar month key in `YYYY-MM` form, used to scope budgets and the
/// dashboard aggregates.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid month {0:?}, expected YYYY-MM")]
pub struct ParseMonthError(String);

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Month> {
        (1..=12).contains(&month).then_some(Month { year, month })
    }

    /// The current calendar month in UTC.
    pub fn current() -> Month {
        Month::from_date(Utc::now().date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Month {
        Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("month is validated on construction")
    }

    /// Half-open date range covering this month, for range queries.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        let next = if self.month == 12 {
            Month {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Month {
                year: self.year,
                month: self.month + 1,
            }
        };
        (self.first_day(), next.first_day())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Month, ParseMonthError> {
        let Some((year, month)) = s.split_once('-') else {
            return Err(ParseMonthError(s.to_owned()));
        };
        let year: i32 = year.parse().map_err(|_| ParseMonthError(s.to_owned()))?;
        let month: u32 = month.parse().map_err(|_| ParseMonthError(s.to_owned()))?;
        Month::new(year, month).ok_or_else(|| ParseMonthError(s.to_owned()))
    }
}

impl TryFrom<String> for Month {
    type Error = ParseMonthError;

    fn try_from(s: String) -> Result<Month, ParseMonthError> {
        s.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> String {
        month.to_string()
    }
}
