use crate::db::{decimal_column, month_column};
use crate::errors::{AppError, AppResult};
use crate::models::{MonthKey, WorkForecast};
use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;

const SELECT: &str = "SELECT f.worker_id, w.name, f.project_id, p.confirmed, f.year, f.month, f.percentage
     FROM work_forecasts f
     JOIN workers w ON w.id = f.worker_id
     JOIN projects p ON p.id = f.project_id";

fn map_row(row: &Row) -> rusqlite::Result<WorkForecast> {
    let pct: String = row.get(6)?;
    Ok(WorkForecast {
        worker_id: row.get(0)?,
        worker_name: row.get(1)?,
        project_id: row.get(2)?,
        project_confirmed: row.get::<_, i32>(3)? == 1,
        month: month_column(row.get(4)?, row.get(5)?)?,
        percentage: decimal_column(6, &pct)?,
    })
}

/// Percentages must stay within 0..=100.
pub fn validate_percentage(pct: Decimal) -> AppResult<Decimal> {
    if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
        return Err(AppError::InvalidPercentage(pct.to_string()));
    }
    Ok(pct)
}

/// Insert or replace the forecast for `(worker, project, month)`.
pub fn set_forecast(
    conn: &Connection,
    worker_id: i64,
    project_id: i64,
    month: MonthKey,
    percentage: Decimal,
) -> AppResult<()> {
    let pct = validate_percentage(percentage)?;
    conn.execute(
        "INSERT INTO work_forecasts (worker_id, project_id, year, month, percentage)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(worker_id, project_id, year, month)
         DO UPDATE SET percentage = excluded.percentage",
        params![worker_id, project_id, month.year, month.month, pct.to_string()],
    )?;
    Ok(())
}

pub fn for_project(
    conn: &Connection,
    project_id: i64,
    worker_id: Option<i64>,
) -> AppResult<Vec<WorkForecast>> {
    let sql = format!(
        "{SELECT}
         WHERE f.project_id = ?1 AND (?2 IS NULL OR f.worker_id = ?2)
         ORDER BY f.year ASC, f.month ASC, w.name ASC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![project_id, worker_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Every forecast of a worker, across all projects.
pub fn for_worker(conn: &Connection, worker_id: i64) -> AppResult<Vec<WorkForecast>> {
    let sql = format!(
        "{SELECT}
         WHERE f.worker_id = ?1
         ORDER BY f.year ASC, f.month ASC, f.project_id ASC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![worker_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
