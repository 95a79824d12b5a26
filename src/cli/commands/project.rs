use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::overview::{projects_time_span, total_forecast};
use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::db::projects::{
    clear_resolved_missing_aliases, get_project, insert_project, list_projects, set_project_flags,
};
use crate::db::workers::get_worker;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info, success};
use crate::utils::date::{parse_end_date, parse_start_date};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Project {
        add,
        start,
        end,
        confirmed,
        confirm,
        archive,
        list,
        all,
        overview,
        worker,
    } = cmd
    {
        let pool = DbPool::open_initialized(&cfg.database)?;
        let conn = &pool.conn;

        if let Some(name) = add {
            let start = start
                .as_deref()
                .ok_or_else(|| AppError::InvalidDate("missing --start".into()))?;
            let end = end
                .as_deref()
                .ok_or_else(|| AppError::InvalidDate("missing --end".into()))?;

            let project = insert_project(
                conn,
                name,
                parse_start_date(start)?,
                parse_end_date(end)?,
                *confirmed,
            )?;
            let cleared = clear_resolved_missing_aliases(conn)?;

            audit_quietly(
                conn,
                "project",
                &project.name,
                &format!(
                    "Project registered ({} → {})",
                    project.first_month(),
                    project.last_month()
                ),
            );
            success(format!(
                "Project '{}' active {} → {}",
                project.name,
                project.first_month(),
                project.last_month()
            ));
            if cleared > 0 {
                info(format!("{} pending alias request(s) resolved", cleared));
            }
        }

        if let Some(name) = confirm {
            let project = get_project(conn, name)?;
            set_project_flags(conn, project.id, Some(true), None)?;
            audit_quietly(conn, "project", &project.name, "Project confirmed");
            success(format!("Project '{}' confirmed", project.name));
        }

        if let Some(name) = archive {
            let project = get_project(conn, name)?;
            set_project_flags(conn, project.id, None, Some(true))?;
            audit_quietly(conn, "project", &project.name, "Project archived");
            success(format!("Project '{}' archived", project.name));
        }

        if *list {
            let projects = list_projects(conn, false, *all)?;
            if projects.is_empty() {
                info("No projects registered.");
            }
            for p in projects {
                println!(
                    "{:>4}  {:<32} {} → {}  {}{}",
                    p.id,
                    p.name,
                    p.first_month(),
                    p.last_month(),
                    if p.confirmed { "confirmed" } else { "tentative" },
                    if p.archived { " (archived)" } else { "" }
                );
            }
        }

        if *overview {
            let projects = list_projects(conn, false, false)?;
            let Some(span) = projects_time_span(&projects) else {
                info("No active projects.");
                return Ok(());
            };
            let worker = match worker {
                Some(name) => Some(get_worker(conn, name)?),
                None => None,
            };
            let load = total_forecast(conn, &projects, worker.as_ref())?;

            header(match &worker {
                Some(w) => format!("Forecast load of {} ({})", w.name, span),
                None => format!("Forecast load of {} project(s) ({})", projects.len(), span),
            });
            for month in span.start.iter_to(span.end) {
                if let Some(pct) = load.get(&month) {
                    println!("{:<8} {:>9}%", month.to_string(), pct.normalize());
                }
            }
        }
    }

    Ok(())
}
