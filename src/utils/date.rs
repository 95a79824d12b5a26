use crate::errors::{AppError, AppResult};
use crate::models::MonthKey;
use chrono::{Months, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn current_month() -> MonthKey {
    MonthKey::of(today())
}

pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| AppError::InvalidDate(s.to_string()))
}

/// First day of a `YYYY-MM` or the given `YYYY-MM-DD`.
pub fn parse_start_date(s: &str) -> AppResult<NaiveDate> {
    if let Ok(d) = parse_date(s) {
        return Ok(d);
    }
    let month: MonthKey = s.parse()?;
    month
        .first_day()
        .ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

/// Last day of a `YYYY-MM` or the given `YYYY-MM-DD`.
pub fn parse_end_date(s: &str) -> AppResult<NaiveDate> {
    if let Ok(d) = parse_date(s) {
        return Ok(d);
    }
    let month: MonthKey = s.parse()?;
    last_day_of(month).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

pub fn last_day_of(month: MonthKey) -> Option<NaiveDate> {
    month
        .first_day()?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}
