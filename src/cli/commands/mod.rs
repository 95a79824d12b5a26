pub mod alias;
pub mod balance;
pub mod config;
pub mod dedication;
pub mod forecast;
pub mod ingest;
pub mod init;
pub mod log;
pub mod project;
pub mod totals;
pub mod transaction;
pub mod worker;

use crate::errors::{AppError, AppResult};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a user supplied decimal, accepting a comma as decimal separator.
pub(crate) fn parse_decimal(raw: &str, err: fn(String) -> AppError) -> AppResult<Decimal> {
    let normalized = raw.trim().replace(',', ".");
    Decimal::from_str(&normalized).map_err(|_| err(raw.to_string()))
}
