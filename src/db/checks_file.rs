//! Reader for the attendance app's SQLite export.
//!
//! The export has two tables: `check_types(id, name)` and
//! `checks(timestamp, check_type_id, multiplier)`. Exports from older app
//! versions have no `multiplier` column; every check then counts fully.

use crate::core::source::EventSource;
use crate::errors::{AppError, AppResult};
use crate::models::{CheckEvent, MonthKey, MonthRange};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use std::collections::HashMap;
use std::path::Path;

pub const TIMESTAMP_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub struct ChecksFile {
    conn: Connection,
    has_multiplier: bool,
}

impl ChecksFile {
    pub fn open(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("check file not found: {}", path.display()),
            )));
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> AppResult<Self> {
        let has_multiplier = checks_has_multiplier_column(&conn)?;
        Ok(Self {
            conn,
            has_multiplier,
        })
    }

    pub fn has_multiplier(&self) -> bool {
        self.has_multiplier
    }

    fn select(&self) -> &'static str {
        if self.has_multiplier {
            "SELECT timestamp, check_type_id, multiplier FROM checks"
        } else {
            "SELECT timestamp, check_type_id, NULL FROM checks"
        }
    }

    fn query_events(&self, sql: &str, param: &str) -> AppResult<Vec<CheckEvent>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params![param], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<i64>>(1)?,
                row.get::<_, Option<i64>>(2)?,
            ))
        })?;

        let mut out = Vec::new();
        for r in rows {
            let (ts, category, multiplier) = r?;
            out.push(CheckEvent::new(
                parse_timestamp(&ts)?,
                category,
                to_multiplier(multiplier)?,
            ));
        }
        Ok(out)
    }
}

/// Check if the `checks` table has a `multiplier` column.
fn checks_has_multiplier_column(conn: &Connection) -> AppResult<bool> {
    let mut stmt = conn.prepare("PRAGMA table_info('checks')")?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == "multiplier" {
            return Ok(true);
        }
    }
    Ok(false)
}

pub fn parse_timestamp(raw: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FMT)
        .map_err(|_| AppError::InvalidTimestamp(raw.to_string()))
}

fn to_multiplier(raw: Option<i64>) -> AppResult<u8> {
    match raw {
        None => Ok(100),
        Some(m) if (0..=100).contains(&m) => Ok(m as u8),
        Some(m) => Err(AppError::InvalidMultiplier(m)),
    }
}

impl EventSource for ChecksFile {
    fn category_names(&self) -> AppResult<HashMap<i64, String>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM check_types")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut out = HashMap::new();
        for r in rows {
            let (id, name) = r?;
            out.insert(id, name);
        }
        Ok(out)
    }

    fn events_for_month(&self, month: MonthKey) -> AppResult<Vec<CheckEvent>> {
        self.query_events(
            &format!("{} WHERE timestamp LIKE ?1 ORDER BY timestamp ASC", self.select()),
            &format!("{month}-%"),
        )
    }

    fn first_event_after(&self, month: MonthKey) -> AppResult<Option<CheckEvent>> {
        // ISO timestamps sort as text, so the first day of the next month is a lower bound
        let events = self.query_events(
            &format!(
                "{} WHERE timestamp >= ?1 ORDER BY timestamp ASC LIMIT 1",
                self.select()
            ),
            &format!("{}-01", month.succ()),
        )?;
        Ok(events.into_iter().next())
    }

    fn month_span(&self) -> AppResult<Option<MonthRange>> {
        let bounds: Option<(Option<String>, Option<String>)> = self
            .conn
            .query_row("SELECT MIN(timestamp), MAX(timestamp) FROM checks", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()?;

        match bounds {
            Some((Some(first), Some(last))) => {
                let start = MonthKey::of(parse_timestamp(&first)?.date());
                let end = MonthKey::of(parse_timestamp(&last)?.date());
                Ok(Some(MonthRange::new(start, end)?))
            }
            _ => Ok(None),
        }
    }
}
