use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::buckets::WorkTotals;
use crate::core::totals::{project_assessment_totals, project_forecast_totals};
use crate::db::pool::DbPool;
use crate::db::projects::get_project;
use crate::db::workers::get_worker;
use crate::errors::AppResult;
use crate::models::MonthKey;
use crate::ui::messages::header;
use crate::utils::date::current_month;
use crate::utils::formatting::{bold, pad_left, pad_right, secs2readable};
use serde_json::json;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Totals {
        project,
        worker,
        assessments,
        from,
        until,
        json,
    } = cmd
    {
        let pool = DbPool::open_initialized(&cfg.database)?;
        let conn = &pool.conn;

        let project = get_project(conn, project)?;
        let worker = match worker {
            Some(name) => Some(get_worker(conn, name)?),
            None => None,
        };
        let now = current_month();

        if *assessments {
            let until = until.as_deref().map(str::parse::<MonthKey>).transpose()?;
            let totals = project_assessment_totals(conn, &project, worker.as_ref(), now, until)?;

            if *json {
                let rows: Vec<_> = totals
                    .totals
                    .iter()
                    .map(|(m, d)| {
                        json!({
                            "month": m,
                            "seconds": d.num_seconds(),
                            "explanation": totals.explanations.get(m).cloned().unwrap_or_default(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                header(format!("Assessed time of {}", project.name));
                print_table(&totals, |d| secs2readable(d.num_seconds()));
            }
        } else {
            let from = from.as_deref().map(str::parse::<MonthKey>).transpose()?;
            let totals = project_forecast_totals(conn, &project, worker.as_ref(), now, from)?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&totals)?);
            } else {
                header(format!("Forecast of {}", project.name));
                print_table(&totals, |p| format!("{}%", p.normalize()));
            }
        }
    }

    Ok(())
}

fn print_table<T: Copy>(totals: &WorkTotals<T>, fmt: impl Fn(T) -> String) {
    println!("{} {}", bold(&pad_right("Month", 8)), bold(&pad_left("Total", 10)));
    for (month, value) in &totals.totals {
        println!(
            "{} {}",
            pad_right(&month.to_string(), 8),
            pad_left(&fmt(*value), 10)
        );
        if let Some(lines) = totals.explanations.get(month) {
            for line in lines.lines() {
                println!("           {}", line);
            }
        }
    }
}
