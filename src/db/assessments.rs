use crate::db::month_column;
use crate::errors::AppResult;
use crate::models::{MonthKey, WorkAssessment};
use rusqlite::{Connection, Row, params};

fn map_row(row: &Row) -> rusqlite::Result<WorkAssessment> {
    Ok(WorkAssessment {
        worker_id: row.get(0)?,
        worker_name: row.get(1)?,
        project_id: row.get(2)?,
        month: month_column(row.get(3)?, row.get(4)?)?,
        duration_secs: row.get(5)?,
    })
}

/// Remove every assessment of a worker. Returns the number of rows deleted.
pub fn delete_by_worker(conn: &Connection, worker_id: i64) -> AppResult<usize> {
    Ok(conn.execute(
        "DELETE FROM work_assessments WHERE worker_id = ?1",
        params![worker_id],
    )?)
}

/// Create the `(worker, project, month)` row or add `duration_secs` to it.
pub fn accumulate(
    conn: &Connection,
    worker_id: i64,
    project_id: i64,
    month: MonthKey,
    duration_secs: i64,
) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO work_assessments (worker_id, project_id, year, month, duration_secs)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(worker_id, project_id, year, month)
         DO UPDATE SET duration_secs = duration_secs + excluded.duration_secs",
    )?;
    stmt.execute(params![
        worker_id,
        project_id,
        month.year,
        month.month,
        duration_secs
    ])?;
    Ok(())
}

/// Assessments of a project, optionally for a single worker.
pub fn for_project(
    conn: &Connection,
    project_id: i64,
    worker_id: Option<i64>,
) -> AppResult<Vec<WorkAssessment>> {
    let mut stmt = conn.prepare_cached(
        "SELECT a.worker_id, w.name, a.project_id, a.year, a.month, a.duration_secs
         FROM work_assessments a
         JOIN workers w ON w.id = a.worker_id
         WHERE a.project_id = ?1 AND (?2 IS NULL OR a.worker_id = ?2)
         ORDER BY a.year ASC, a.month ASC, w.name ASC",
    )?;
    let rows = stmt.query_map(params![project_id, worker_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn for_worker(conn: &Connection, worker_id: i64) -> AppResult<Vec<WorkAssessment>> {
    let mut stmt = conn.prepare_cached(
        "SELECT a.worker_id, w.name, a.project_id, a.year, a.month, a.duration_secs
         FROM work_assessments a
         JOIN workers w ON w.id = a.worker_id
         WHERE a.worker_id = ?1
         ORDER BY a.year ASC, a.month ASC, a.project_id ASC",
    )?;
    let rows = stmt.query_map(params![worker_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
