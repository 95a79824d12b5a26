use crate::errors::{AppError, AppResult};
use crate::models::Worker;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_row(row: &Row) -> rusqlite::Result<Worker> {
    Ok(Worker {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

pub fn insert_worker(conn: &Connection, name: &str) -> AppResult<Worker> {
    let name = name.trim();
    conn.execute("INSERT INTO workers (name) VALUES (?1)", params![name])?;
    Ok(Worker {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

pub fn find_worker(conn: &Connection, name: &str) -> AppResult<Option<Worker>> {
    let worker = conn
        .query_row(
            "SELECT id, name FROM workers WHERE name = ?1",
            params![name.trim()],
            map_row,
        )
        .optional()?;
    Ok(worker)
}

pub fn get_worker(conn: &Connection, name: &str) -> AppResult<Worker> {
    find_worker(conn, name)?.ok_or_else(|| AppError::UnknownWorker(name.to_string()))
}

pub fn list_workers(conn: &Connection) -> AppResult<Vec<Worker>> {
    let mut stmt = conn.prepare("SELECT id, name FROM workers ORDER BY name ASC")?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
