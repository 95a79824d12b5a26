use crate::cli::commands::parse_decimal;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::dedication::worker_forecast_summary;
use crate::db::forecasts::{self, set_forecast};
use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::db::projects::get_project;
use crate::db::workers::get_worker;
use crate::errors::{AppError, AppResult};
use crate::models::MonthKey;
use crate::ui::messages::{header, info, success, warning};
use rust_decimal::Decimal;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Forecast {
        worker,
        project,
        month,
        set,
        summary,
    } = cmd
    {
        let pool = DbPool::open_initialized(&cfg.database)?;
        let conn = &pool.conn;
        let worker = get_worker(conn, worker)?;

        if let Some(project_name) = project {
            let project = get_project(conn, project_name)?;
            let month: MonthKey = month
                .as_deref()
                .ok_or_else(|| AppError::InvalidMonth("missing --month".into()))?
                .parse()?;
            let pct = parse_decimal(
                set.as_deref()
                    .ok_or_else(|| AppError::InvalidPercentage("missing --set".into()))?,
                AppError::InvalidPercentage,
            )?;

            set_forecast(conn, worker.id, project.id, month, pct)?;
            audit_quietly(
                conn,
                "forecast",
                &project.name,
                &format!("{} {} {}%", worker.name, month, pct.normalize()),
            );
            success(format!(
                "{} forecast at {}% on '{}' for {}",
                worker.name,
                pct.normalize(),
                project.name,
                month
            ));
        }

        if *summary {
            let rows = forecasts::for_worker(conn, worker.id)?;
            if rows.is_empty() {
                info(format!("No forecasts for {}.", worker.name));
                return Ok(());
            }

            let s = worker_forecast_summary(&rows);
            header(format!("Forecast load of {}", worker.name));
            println!("{:<8} {:>10} {:>10}", "Month", "Total", "Confirmed");
            for (month, total) in &s.total {
                let confirmed = s.confirmed_total.get(month).copied().unwrap_or(Decimal::ZERO);
                println!(
                    "{:<8} {:>9}% {:>9}%",
                    month.to_string(),
                    total.normalize(),
                    confirmed.normalize()
                );
            }
            let overbooked = s
                .total
                .values()
                .filter(|v| **v > Decimal::ONE_HUNDRED)
                .count();
            if overbooked > 0 {
                warning(format!("{} month(s) above 100%", overbooked));
            }
        }
    }

    Ok(())
}
