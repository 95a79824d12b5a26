use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::db::projects::{
    clear_resolved_missing_aliases, find_project_by_id, get_project, list_aliases,
    list_missing_aliases, upsert_alias,
};
use crate::db::workers::{get_worker, list_workers};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::collections::HashMap;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Alias {
        worker,
        add,
        project,
        missing,
        list,
    } = cmd
    {
        let pool = DbPool::open_initialized(&cfg.database)?;
        let conn = &pool.conn;

        let worker = match worker {
            Some(name) => Some(get_worker(conn, name)?),
            None => None,
        };

        if let Some(alias) = add {
            let worker = worker
                .as_ref()
                .ok_or_else(|| AppError::UnknownWorker("missing --worker".into()))?;
            let project_name = project
                .as_deref()
                .ok_or_else(|| AppError::UnknownProject("missing --project".into()))?;
            let target = get_project(conn, project_name)?;

            let created = upsert_alias(conn, worker.id, alias, target.id)?;
            let cleared = clear_resolved_missing_aliases(conn)?;

            audit_quietly(
                conn,
                "alias",
                &created.alias,
                &format!("{} → {} for {}", created.alias, target.name, worker.name),
            );
            success(format!(
                "'{}' now maps to '{}' for {}",
                created.alias, target.name, worker.name
            ));
            if cleared > 0 {
                info(format!("{} pending alias request(s) resolved", cleared));
            }
        }

        if *list && let Some(w) = &worker {
            for a in list_aliases(conn, w.id)? {
                let target = find_project_by_id(conn, a.project_id)?
                    .map(|p| p.name)
                    .unwrap_or_else(|| format!("#{}", a.project_id));
                println!("{:<32} → {}", a.alias, target);
            }
        }

        if *missing {
            let names: HashMap<i64, String> = list_workers(conn)?
                .into_iter()
                .map(|w| (w.id, w.name))
                .collect();
            let pending = list_missing_aliases(conn, worker.as_ref().map(|w| w.id))?;
            if pending.is_empty() {
                success("No pending aliases.");
            } else {
                warning(format!("{} pending alias request(s):", pending.len()));
                for m in pending {
                    let who = names.get(&m.worker_id).map(String::as_str).unwrap_or("?");
                    println!("   {:<20} {}", who, m.alias);
                }
            }
        }
    }

    Ok(())
}
