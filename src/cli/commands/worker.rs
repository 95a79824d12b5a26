use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::db::workers::{insert_worker, list_workers};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Worker { add, list } = cmd {
        let pool = DbPool::open_initialized(&cfg.database)?;

        if let Some(name) = add {
            let worker = insert_worker(&pool.conn, name)?;
            audit_quietly(&pool.conn, "worker", &worker.name, "Worker registered");
            success(format!("Worker '{}' registered (id {})", worker.name, worker.id));
        }

        if *list {
            let workers = list_workers(&pool.conn)?;
            if workers.is_empty() {
                info("No workers registered.");
            }
            for w in workers {
                println!("{:>4}  {}", w.id, w.name);
            }
        }
    }

    Ok(())
}
