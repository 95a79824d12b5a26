//! Versioned schema migrations.
//!
//! Each migration runs once, inside its own transaction, and is recorded in
//! `schema_migrations`. The `log` table is ensured before anything else so
//! applied migrations can be audited.

use crate::db::log::audit;
use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "core_tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS workers (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            name  TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS projects (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE,
            date_start  TEXT NOT NULL,
            date_end    TEXT NOT NULL,
            confirmed   INTEGER NOT NULL DEFAULT 0,
            archived    INTEGER NOT NULL DEFAULT 0,
            CHECK (date_start <= date_end)
        );

        CREATE TABLE IF NOT EXISTS project_aliases (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id   INTEGER NOT NULL REFERENCES workers(id) ON DELETE CASCADE,
            alias       TEXT NOT NULL,
            project_id  INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            UNIQUE (worker_id, alias)
        );

        CREATE TABLE IF NOT EXISTS missing_project_aliases (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id   INTEGER NOT NULL REFERENCES workers(id) ON DELETE CASCADE,
            alias       TEXT NOT NULL,
            UNIQUE (worker_id, alias)
        );
        "#,
    },
    Migration {
        version: 2,
        name: "work_tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS work_assessments (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id      INTEGER NOT NULL REFERENCES workers(id) ON DELETE CASCADE,
            project_id     INTEGER NOT NULL REFERENCES projects(id),
            year           INTEGER NOT NULL,
            month          INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
            duration_secs  INTEGER NOT NULL DEFAULT 0,
            UNIQUE (worker_id, project_id, year, month)
        );

        CREATE TABLE IF NOT EXISTS work_forecasts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id   INTEGER NOT NULL REFERENCES workers(id) ON DELETE CASCADE,
            project_id  INTEGER NOT NULL REFERENCES projects(id),
            year        INTEGER NOT NULL,
            month       INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
            percentage  TEXT NOT NULL,
            UNIQUE (worker_id, project_id, year, month)
        );

        CREATE TABLE IF NOT EXISTS worker_dedications (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id   INTEGER NOT NULL REFERENCES workers(id) ON DELETE CASCADE,
            year        INTEGER NOT NULL,
            month       INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
            dedication  TEXT NOT NULL,
            UNIQUE (worker_id, year, month)
        );

        CREATE INDEX IF NOT EXISTS idx_assessments_project ON work_assessments(project_id);
        CREATE INDEX IF NOT EXISTS idx_forecasts_project ON work_forecasts(project_id);
        "#,
    },
    Migration {
        version: 3,
        name: "transactions",
        sql: r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id  INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            date        TEXT NOT NULL,
            concept     TEXT NOT NULL DEFAULT '',
            amount      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transactions_project_date ON transactions(project_id, date);
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn ensure_migrations_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY,
            name        TEXT NOT NULL,
            applied_at  TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Highest applied migration version, 0 on a fresh database.
pub fn current_version(conn: &Connection) -> AppResult<i64> {
    let v: Option<i64> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .optional()?
        .flatten();
    Ok(v.unwrap_or(0))
}

pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;
    ensure_migrations_table(conn)?;

    let current = current_version(conn)?;

    for m in MIGRATIONS.iter().filter(|m| m.version > current) {
        let applied_at = chrono::Local::now().to_rfc3339();

        conn.execute_batch("BEGIN;")?;
        let result = conn.execute_batch(m.sql).and_then(|_| {
            conn.execute(
                "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![m.version, m.name, applied_at],
            )
        });

        match result {
            Ok(_) => conn.execute_batch("COMMIT;")?,
            Err(e) => {
                conn.execute_batch("ROLLBACK;")?;
                return Err(AppError::Migration(format!(
                    "migration {} ({}) failed: {}",
                    m.version, m.name, e
                )));
            }
        }

        info!(version = m.version, name = m.name, "applied schema migration");
        audit(
            conn,
            "migration_applied",
            m.name,
            &format!("Schema migrated to version {}", m.version),
        )?;
    }

    Ok(())
}
