use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ingest::Ingestor;
use crate::core::locks::WorkerLocks;
use crate::core::notify::{Notifier, SubscriberRegistry, TracingSink};
use crate::core::source::EventSource;
use crate::db::checks_file::ChecksFile;
use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::db::workers::get_worker;
use crate::errors::AppResult;
use crate::models::MonthRange;
use crate::ui::messages::{info, item, success, warning};
use std::path::Path;
use std::sync::Arc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Ingest {
        worker,
        file,
        period,
    } = cmd
    {
        let mut pool = DbPool::open_initialized(&cfg.database)?;
        let worker = get_worker(&pool.conn, worker)?;

        let source = ChecksFile::open(Path::new(file))?;

        let range = match period {
            Some(p) => MonthRange::parse(p)?,
            None => match source.month_span()? {
                Some(span) => span,
                None => {
                    info("The check file has no checks, nothing to ingest.");
                    return Ok(());
                }
            },
        };

        let notifier = Notifier::spawn(
            TracingSink,
            Arc::new(SubscriberRegistry::new()),
            cfg.notify_queue_size,
        );
        let ingestor =
            Ingestor::new(Arc::new(WorkerLocks::new()), cfg.mix_policy()).with_notifier(notifier);

        let outcome = pool.with_conn(|conn| ingestor.run(conn, &source, &worker, range));
        ingestor.shutdown();
        let outcome = outcome?;

        if !outcome.committed() {
            audit_quietly(
                &pool.conn,
                "ingest_blocked",
                &worker.name,
                &format!("{} unresolved categories", outcome.missing.len()),
            );
            warning(format!(
                "Nothing ingested for {}: {} categor{} without a project",
                worker.name,
                outcome.missing.len(),
                if outcome.missing.len() == 1 { "y" } else { "ies" }
            ));
            for name in &outcome.missing {
                item(name);
            }
            info("Map them with `semafor alias --worker <NAME> --add <ALIAS> --project <PROJECT>`.");
            return Ok(());
        }

        audit_quietly(
            &pool.conn,
            "ingest",
            &worker.name,
            &format!(
                "{}: {} record(s), {} skipped",
                range,
                outcome.written,
                outcome.bound_errors.len()
            ),
        );
        success(format!(
            "{} assessment record(s) written for {} ({})",
            outcome.written, worker.name, range
        ));

        if !outcome.bound_errors.is_empty() {
            warning(format!(
                "{} record(s) outside their project's active months were skipped:",
                outcome.bound_errors.len()
            ));
            for line in &outcome.bound_errors {
                item(line);
            }
        }
    }

    Ok(())
}
