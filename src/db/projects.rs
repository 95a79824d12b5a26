//! Projects, worker aliases and pending alias requests.

use crate::db::{DATE_FMT, date_column};
use crate::errors::{AppError, AppResult};
use crate::models::{MissingProjectAlias, Project, ProjectAlias};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

const PROJECT_COLUMNS: &str = "p.id, p.name, p.date_start, p.date_end, p.confirmed, p.archived";

fn map_project(row: &Row) -> rusqlite::Result<Project> {
    let start: String = row.get(2)?;
    let end: String = row.get(3)?;
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        date_start: date_column(2, &start)?,
        date_end: date_column(3, &end)?,
        confirmed: row.get::<_, i32>(4)? == 1,
        archived: row.get::<_, i32>(5)? == 1,
    })
}

pub fn insert_project(
    conn: &Connection,
    name: &str,
    date_start: NaiveDate,
    date_end: NaiveDate,
    confirmed: bool,
) -> AppResult<Project> {
    if date_start > date_end {
        return Err(AppError::InvalidRange(format!(
            "project starts {} after it ends {}",
            date_start, date_end
        )));
    }

    let name = name.trim();
    conn.execute(
        "INSERT INTO projects (name, date_start, date_end, confirmed, archived)
         VALUES (?1, ?2, ?3, ?4, 0)",
        params![
            name,
            date_start.format(DATE_FMT).to_string(),
            date_end.format(DATE_FMT).to_string(),
            if confirmed { 1 } else { 0 },
        ],
    )?;

    Ok(Project {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        date_start,
        date_end,
        confirmed,
        archived: false,
    })
}

/// Exact name match.
pub fn find_project_by_name(conn: &Connection, name: &str) -> AppResult<Option<Project>> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects p WHERE p.name = ?1");
    Ok(conn.query_row(&sql, params![name], map_project).optional()?)
}

pub fn get_project(conn: &Connection, name: &str) -> AppResult<Project> {
    find_project_by_name(conn, name)?.ok_or_else(|| AppError::UnknownProject(name.to_string()))
}

pub fn find_project_by_id(conn: &Connection, id: i64) -> AppResult<Option<Project>> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects p WHERE p.id = ?1");
    Ok(conn.query_row(&sql, params![id], map_project).optional()?)
}

pub fn list_projects(
    conn: &Connection,
    confirmed_only: bool,
    include_archived: bool,
) -> AppResult<Vec<Project>> {
    let mut sql = format!("SELECT {PROJECT_COLUMNS} FROM projects p WHERE 1 = 1");
    if confirmed_only {
        sql.push_str(" AND p.confirmed = 1");
    }
    if !include_archived {
        sql.push_str(" AND p.archived = 0");
    }
    sql.push_str(" ORDER BY p.name ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_project)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn set_project_flags(
    conn: &Connection,
    project_id: i64,
    confirmed: Option<bool>,
    archived: Option<bool>,
) -> AppResult<()> {
    if let Some(c) = confirmed {
        conn.execute(
            "UPDATE projects SET confirmed = ?1 WHERE id = ?2",
            params![c as i32, project_id],
        )?;
    }
    if let Some(a) = archived {
        conn.execute(
            "UPDATE projects SET archived = ?1 WHERE id = ?2",
            params![a as i32, project_id],
        )?;
    }
    Ok(())
}

// ---------------------------
// Aliases
// ---------------------------

/// Create or repoint the alias `(worker, alias)`.
pub fn upsert_alias(
    conn: &Connection,
    worker_id: i64,
    alias: &str,
    project_id: i64,
) -> AppResult<ProjectAlias> {
    let alias = alias.trim();
    conn.execute(
        "INSERT INTO project_aliases (worker_id, alias, project_id)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(worker_id, alias) DO UPDATE SET project_id = excluded.project_id",
        params![worker_id, alias, project_id],
    )?;

    let id: i64 = conn.query_row(
        "SELECT id FROM project_aliases WHERE worker_id = ?1 AND alias = ?2",
        params![worker_id, alias],
        |row| row.get(0),
    )?;

    Ok(ProjectAlias {
        id,
        worker_id,
        alias: alias.to_string(),
        project_id,
    })
}

/// Project that `alias` stands for, for this worker only.
pub fn find_alias(conn: &Connection, worker_id: i64, alias: &str) -> AppResult<Option<Project>> {
    let sql = format!(
        "SELECT {PROJECT_COLUMNS}
         FROM project_aliases a
         JOIN projects p ON p.id = a.project_id
         WHERE a.worker_id = ?1 AND a.alias = ?2"
    );
    Ok(conn
        .query_row(&sql, params![worker_id, alias], map_project)
        .optional()?)
}

pub fn list_aliases(conn: &Connection, worker_id: i64) -> AppResult<Vec<ProjectAlias>> {
    let mut stmt = conn.prepare(
        "SELECT id, worker_id, alias, project_id FROM project_aliases
         WHERE worker_id = ?1 ORDER BY alias ASC",
    )?;
    let rows = stmt.query_map(params![worker_id], |row| {
        Ok(ProjectAlias {
            id: row.get(0)?,
            worker_id: row.get(1)?,
            alias: row.get(2)?,
            project_id: row.get(3)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// Missing aliases
// ---------------------------

/// Idempotent: recording the same name twice keeps a single row.
pub fn upsert_missing_alias(conn: &Connection, worker_id: i64, alias: &str) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO missing_project_aliases (worker_id, alias) VALUES (?1, ?2)",
        params![worker_id, alias],
    )?;
    Ok(())
}

pub fn list_missing_aliases(
    conn: &Connection,
    worker_id: Option<i64>,
) -> AppResult<Vec<MissingProjectAlias>> {
    let mut stmt = conn.prepare(
        "SELECT id, worker_id, alias FROM missing_project_aliases
         WHERE (?1 IS NULL OR worker_id = ?1)
         ORDER BY worker_id ASC, alias ASC",
    )?;
    let rows = stmt.query_map(params![worker_id], |row| {
        Ok(MissingProjectAlias {
            id: row.get(0)?,
            worker_id: row.get(1)?,
            alias: row.get(2)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Drop pending requests that a project name or an alias now covers.
/// Returns how many rows were cleared.
pub fn clear_resolved_missing_aliases(conn: &Connection) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM missing_project_aliases
         WHERE alias IN (SELECT name FROM projects)
            OR EXISTS (
                SELECT 1 FROM project_aliases a
                WHERE a.worker_id = missing_project_aliases.worker_id
                  AND a.alias = missing_project_aliases.alias
            )",
        [],
    )?;
    Ok(n)
}
