use crate::db::{DATE_FMT, date_column, decimal_column};
use crate::errors::AppResult;
use crate::models::Transaction;
use chrono::NaiveDate;
use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;

fn map_row(row: &Row) -> rusqlite::Result<Transaction> {
    let date: String = row.get(2)?;
    let amount: String = row.get(4)?;
    Ok(Transaction {
        id: row.get(0)?,
        project_id: row.get(1)?,
        date: date_column(2, &date)?,
        concept: row.get(3)?,
        amount: decimal_column(4, &amount)?,
    })
}

pub fn insert_transaction(
    conn: &Connection,
    project_id: i64,
    date: NaiveDate,
    concept: &str,
    amount: Decimal,
) -> AppResult<Transaction> {
    conn.execute(
        "INSERT INTO transactions (project_id, date, concept, amount) VALUES (?1, ?2, ?3, ?4)",
        params![
            project_id,
            date.format(DATE_FMT).to_string(),
            concept,
            amount.to_string()
        ],
    )?;

    Ok(Transaction {
        id: conn.last_insert_rowid(),
        project_id,
        date,
        concept: concept.to_string(),
        amount,
    })
}

pub fn for_project(conn: &Connection, project_id: i64) -> AppResult<Vec<Transaction>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, project_id, date, concept, amount FROM transactions
         WHERE project_id = ?1
         ORDER BY date ASC, id ASC",
    )?;
    let rows = stmt.query_map(params![project_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
