use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A calendar month. All results dated inside it form one Glicko-2 rating period.
///
/// Ordering is chronological (year first, then month). Serialized as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct RatingPeriod {
    pub year: i32,
    pub month: u32
}

impl RatingPeriod {
    pub fn new(year: i32, month: u32) -> Option<RatingPeriod> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| RatingPeriod { year, month })
    }

    pub fn from_date(date: NaiveDate) -> RatingPeriod {
        RatingPeriod {
            year: date.year(),
            month: date.month()
        }
    }

    /// The last calendar day of the month.
    pub fn last_day(&self) -> NaiveDate {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };

        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        RatingPeriod::from_date(date) == *self
    }

    /// Label used for history entries
    pub fn label(&self) -> String {
        format!("Monthly rating period {}", self)
    }
}

impl fmt::Display for RatingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for RatingPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("Expected YYYY-MM, found {s}"))?;
        let year = year.parse::<i32>().map_err(|e| e.to_string())?;
        let month = month.parse::<u32>().map_err(|e| e.to_string())?;

        RatingPeriod::new(year, month).ok_or_else(|| format!("Invalid month in {s}"))
    }
}

impl From<RatingPeriod> for String {
    fn from(period: RatingPeriod) -> String {
        period.to_string()
    }
}

impl TryFrom<String> for RatingPeriod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
