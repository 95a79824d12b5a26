pub mod assessments;
pub mod checks_file;
pub mod dedications;
pub mod forecasts;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod projects;
pub mod transactions;
pub mod workers;

pub use migrate::run_pending_migrations;

use crate::errors::AppError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

pub(crate) const DATE_FMT: &str = "%Y-%m-%d";

/// Turn a stored `YYYY-MM-DD` column into a date, reporting the column on failure.
pub(crate) fn date_column(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FMT).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(raw.to_string())),
        )
    })
}

/// Decimals are stored as TEXT to keep them exact.
pub(crate) fn decimal_column(idx: usize, raw: &str) -> rusqlite::Result<Decimal> {
    Decimal::from_str(raw).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidAmount(raw.to_string())),
        )
    })
}

pub(crate) fn month_column(year: i32, month: u32) -> rusqlite::Result<crate::models::MonthKey> {
    crate::models::MonthKey::new(year, month).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Integer,
            Box::new(AppError::InvalidMonth(format!("{year}-{month}"))),
        )
    })
}
