//! Unified application error type.
//! Only infrastructure failures and invalid user input travel through
//! `AppError`; unresolved categories and out-of-window assessments are
//! reported as data in the ingestion outcome.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid month format: {0} (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid timestamp in check file: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid percentage: {0} (must be between 0 and 100)")]
    InvalidPercentage(String),

    #[error("Invalid multiplier: {0} (must be between 0 and 100)")]
    InvalidMultiplier(i64),

    // ---------------------------
    // Lookup errors
    // ---------------------------
    #[error("Unknown project: {0}")]
    UnknownProject(String),

    #[error("Unknown worker: {0}")]
    UnknownWorker(String),

    #[error("Check references unknown category id {0}")]
    UnknownCategory(i64),

    #[error("Invalid month range: {0}")]
    InvalidRange(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
