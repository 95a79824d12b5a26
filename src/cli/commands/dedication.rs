use crate::cli::commands::parse_decimal;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::dedication::dedication_intensity;
use crate::db::dedications::{self, set_dedication};
use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::db::workers::{get_worker, list_workers};
use crate::errors::{AppError, AppResult};
use crate::models::MonthKey;
use crate::ui::messages::{info, success};
use rust_decimal::Decimal;
use std::collections::HashMap;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Dedication {
        worker,
        month,
        set,
        list,
    } = cmd
    {
        let pool = DbPool::open_initialized(&cfg.database)?;
        let conn = &pool.conn;

        let worker = match worker {
            Some(name) => Some(get_worker(conn, name)?),
            None => None,
        };

        if let (Some(w), Some(month)) = (&worker, month) {
            let month: MonthKey = month.parse()?;
            let value = parse_decimal(
                set.as_deref()
                    .ok_or_else(|| AppError::InvalidPercentage("missing --set".into()))?,
                AppError::InvalidPercentage,
            )?;

            set_dedication(conn, w.id, month, value)?;
            audit_quietly(
                conn,
                "dedication",
                &w.name,
                &format!("{} {}%", month, value.normalize()),
            );
            success(format!(
                "{} dedicated {}% in {}",
                w.name,
                value.normalize(),
                month
            ));
        }

        if *list {
            let names: HashMap<i64, String> = list_workers(conn)?
                .into_iter()
                .map(|w| (w.id, w.name))
                .collect();
            let rows = dedications::list(conn, worker.as_ref().map(|w| w.id))?;
            if rows.is_empty() {
                info("No dedications recorded.");
            }
            for r in rows {
                let band = dedication_intensity(r.dedication, Decimal::ONE);
                println!(
                    "{:<8} {:<20} {:>6}%  {}",
                    r.month.to_string(),
                    names.get(&r.worker_id).map(String::as_str).unwrap_or("?"),
                    r.dedication.normalize(),
                    band.css_class()
                );
            }
        }
    }

    Ok(())
}
