use crate::cli::commands::parse_decimal;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::db::projects::get_project;
use crate::db::transactions::insert_transaction;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::date::parse_date;
use crate::utils::formatting::signed_money;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Transaction {
        project,
        date,
        amount,
        concept,
    } = cmd
    {
        let pool = DbPool::open_initialized(&cfg.database)?;
        let conn = &pool.conn;

        let project = get_project(conn, project)?;
        let date = parse_date(date)?;
        let amount = parse_decimal(amount, AppError::InvalidAmount)?;

        let tx = insert_transaction(conn, project.id, date, concept, amount)?;
        audit_quietly(
            conn,
            "transaction",
            &project.name,
            &format!("{} {} {}", tx.date, signed_money(tx.amount), tx.concept),
        );
        success(format!(
            "Recorded {} on '{}' ({})",
            signed_money(tx.amount),
            project.name,
            tx.date
        ));
    }

    Ok(())
}
