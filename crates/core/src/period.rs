use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar month bucket used for grouping, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(YearMonth { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            YearMonth { year: self.year - 1, month: 12 }
        } else {
            YearMonth { year: self.year, month: self.month - 1 }
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("Expected YYYY-MM, got '{s}'"))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| format!("Invalid year in '{s}'"))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| format!("Invalid month in '{s}'"))?;
        YearMonth::new(year, month).ok_or_else(|| format!("Month out of range in '{s}'"))
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for YearMonth {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered, counting both ends.
    pub fn days(self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Window a budget is measured over.
///
/// Month-relative periods are anchored on the latest transaction date of the
/// dataset rather than the wall clock, so the same statement always produces
/// the same budget figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetPeriod {
    AllTime,
    #[default]
    CurrentMonth,
    PreviousMonth,
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetPeriod::AllTime => write!(f, "all-time"),
            BudgetPeriod::CurrentMonth => write!(f, "current-month"),
            BudgetPeriod::PreviousMonth => write!(f, "previous-month"),
        }
    }
}

impl FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "all-time" | "all" => Ok(BudgetPeriod::AllTime),
            "current-month" | "this-month" | "current" => Ok(BudgetPeriod::CurrentMonth),
            "previous-month" | "last-month" | "previous" => Ok(BudgetPeriod::PreviousMonth),
            other => Err(format!("Unknown budget period: '{other}'")),
        }
    }
}

impl BudgetPeriod {
    /// The month this period selects, given the latest date in the dataset.
    /// `None` means every transaction is in scope.
    pub fn month(self, latest: NaiveDate) -> Option<YearMonth> {
        let current = YearMonth::from_date(latest);
        match self {
            BudgetPeriod::AllTime => None,
            BudgetPeriod::CurrentMonth => Some(current),
            BudgetPeriod::PreviousMonth => Some(current.previous()),
        }
    }
}
