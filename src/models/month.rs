use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Calendar month used as bucket key everywhere (year, month 1..=12).
///
/// Ordering is the ordering of `year * 12 + month`, which the derived
/// `Ord` on `(year, month)` already gives us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Linear month index, `year * 12 + (month - 1)`.
    pub fn index(self) -> i64 {
        self.year as i64 * 12 + self.month as i64 - 1
    }

    pub fn from_index(index: i64) -> Self {
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn succ(self) -> Self {
        self.plus(1)
    }

    pub fn pred(self) -> Self {
        self.plus(-1)
    }

    pub fn plus(self, months: i64) -> Self {
        Self::from_index(self.index() + months)
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Inclusive walk from `start` to `end`. Empty when `start > end`.
    pub fn iter_to(self, end: MonthKey) -> impl Iterator<Item = MonthKey> {
        (self.index()..=end.index()).map(MonthKey::from_index)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        let (y, m) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| AppError::InvalidMonth(s.to_string()))?;

        let year = y
            .parse::<i32>()
            .map_err(|_| AppError::InvalidMonth(s.to_string()))?;
        let month = m
            .parse::<u32>()
            .map_err(|_| AppError::InvalidMonth(s.to_string()))?;

        MonthKey::new(year, month).ok_or_else(|| AppError::InvalidMonth(s.to_string()))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Inclusive range of months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: MonthKey,
    pub end: MonthKey,
}

impl MonthRange {
    pub fn new(start: MonthKey, end: MonthKey) -> AppResult<Self> {
        if start > end {
            return Err(AppError::InvalidRange(format!("{start} is after {end}")));
        }
        Ok(Self { start, end })
    }

    pub fn single(month: MonthKey) -> Self {
        Self {
            start: month,
            end: month,
        }
    }

    pub fn contains(&self, month: MonthKey) -> bool {
        self.start <= month && month <= self.end
    }

    /// Parse `YYYY-MM` or `YYYY-MM:YYYY-MM`.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.split_once(':') {
            Some((a, b)) => MonthRange::new(a.parse()?, b.parse()?),
            None => Ok(MonthRange::single(s.parse()?)),
        }
    }
}

impl fmt::Display for MonthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}
