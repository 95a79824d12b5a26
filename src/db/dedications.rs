use crate::db::{decimal_column, month_column};
use crate::errors::{AppError, AppResult};
use crate::models::{MonthKey, WorkerDedication};
use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;

fn map_row(row: &Row) -> rusqlite::Result<WorkerDedication> {
    let dedication: String = row.get(3)?;
    Ok(WorkerDedication {
        worker_id: row.get(0)?,
        month: month_column(row.get(1)?, row.get(2)?)?,
        dedication: decimal_column(3, &dedication)?,
    })
}

pub fn set_dedication(
    conn: &Connection,
    worker_id: i64,
    month: MonthKey,
    dedication: Decimal,
) -> AppResult<()> {
    if dedication.is_sign_negative() {
        return Err(AppError::InvalidPercentage(dedication.to_string()));
    }
    conn.execute(
        "INSERT INTO worker_dedications (worker_id, year, month, dedication)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(worker_id, year, month) DO UPDATE SET dedication = excluded.dedication",
        params![worker_id, month.year, month.month, dedication.to_string()],
    )?;
    Ok(())
}

/// Dedications of one worker, or of everyone when `worker_id` is `None`.
pub fn list(conn: &Connection, worker_id: Option<i64>) -> AppResult<Vec<WorkerDedication>> {
    let mut stmt = conn.prepare_cached(
        "SELECT worker_id, year, month, dedication FROM worker_dedications
         WHERE (?1 IS NULL OR worker_id = ?1)
         ORDER BY year ASC, month ASC, worker_id ASC",
    )?;
    let rows = stmt.query_map(params![worker_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
