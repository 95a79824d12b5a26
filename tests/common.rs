#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, params};
use semafor::db::pool::DbPool;
use semafor::db::projects::insert_project;
use semafor::db::workers::insert_worker;
use semafor::models::{CheckEvent, Project, Worker};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn sem() -> Command {
    cargo_bin_cmd!("semafor")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_semafor.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Temp path for an attendance export, removed if it already exists
pub fn temp_checks_file(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_checks.sqlite", name));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize a DB through the CLI in test mode (no config file written)
pub fn init_db(db_path: &str) {
    sem()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("valid test timestamp")
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

pub fn open(at: &str, category: i64) -> CheckEvent {
    CheckEvent::new(ts(at), Some(category), 100)
}

pub fn close(at: &str) -> CheckEvent {
    CheckEvent::close(ts(at))
}

/// In-memory DB with the full schema
pub fn memory_db() -> DbPool {
    DbPool::in_memory().expect("in-memory db")
}

pub fn add_worker(pool: &DbPool, name: &str) -> Worker {
    insert_worker(&pool.conn, name).expect("insert worker")
}

pub fn add_project(pool: &DbPool, name: &str, start: &str, end: &str, confirmed: bool) -> Project {
    insert_project(&pool.conn, name, date(start), date(end), confirmed).expect("insert project")
}

/// Write an attendance export: `check_types(id, name)` and
/// `checks(timestamp, check_type_id, [multiplier])`.
pub fn write_checks_file(
    path: &str,
    types: &[(i64, &str)],
    checks: &[(&str, Option<i64>, Option<i64>)],
    with_multiplier: bool,
) {
    let conn = Connection::open(path).expect("create checks file");
    conn.execute_batch("CREATE TABLE check_types (id INTEGER PRIMARY KEY, name TEXT NOT NULL);")
        .expect("create check_types");
    if with_multiplier {
        conn.execute_batch(
            "CREATE TABLE checks (timestamp TEXT NOT NULL, check_type_id INTEGER, multiplier INTEGER);",
        )
        .expect("create checks");
    } else {
        conn.execute_batch("CREATE TABLE checks (timestamp TEXT NOT NULL, check_type_id INTEGER);")
            .expect("create checks");
    }

    for (id, name) in types {
        conn.execute(
            "INSERT INTO check_types (id, name) VALUES (?1, ?2)",
            params![id, name],
        )
        .expect("insert check type");
    }
    for (timestamp, category, multiplier) in checks {
        if with_multiplier {
            conn.execute(
                "INSERT INTO checks (timestamp, check_type_id, multiplier) VALUES (?1, ?2, ?3)",
                params![timestamp, category, multiplier],
            )
            .expect("insert check");
        } else {
            conn.execute(
                "INSERT INTO checks (timestamp, check_type_id) VALUES (?1, ?2)",
                params![timestamp, category],
            )
            .expect("insert check");
        }
    }
}
