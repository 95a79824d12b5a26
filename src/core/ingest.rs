//! Turn a worker's check file into monthly work assessments.
//!
//! Pipeline: load checks → rebuild intervals → redistribute mixed time →
//! resolve categories to projects → replace the worker's assessments in a
//! single transaction.

use crate::core::calculator::intervals::{
    MonthlyDurations, discard_dangling, reconstruct, round_to_seconds,
};
use crate::core::calculator::mix::{MixPolicy, redistribute};
use crate::core::locks::{WorkerLocks, acquire};
use crate::core::notify::{ForecastRefresh, Notifier};
use crate::core::resolver::{Resolution, resolve_categories};
use crate::core::source::EventSource;
use crate::core::validation::{check_active_window, describe_violation};
use crate::db::assessments;
use crate::errors::AppResult;
use crate::models::{CheckEvent, MonthRange, Worker};
use rusqlite::{Connection, TransactionBehavior};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Category names with no project; non-empty means nothing was written.
    pub missing: BTreeSet<String>,
    /// One line per skipped out-of-window record.
    pub bound_errors: Vec<String>,
    /// Number of `(project, month)` records written.
    pub written: usize,
    /// Projects that received at least one record.
    pub projects: BTreeSet<i64>,
}

impl IngestOutcome {
    pub fn committed(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Load the checks needed to rebuild `range`.
///
/// The first check after the range is appended, however far away it is, so
/// the last interval of the range is closed the same way whatever range the
/// caller asks for. Without such a check the stream reaches the end of the
/// source and dangling open checks are dropped.
pub fn load_events(source: &dyn EventSource, range: MonthRange) -> AppResult<Vec<CheckEvent>> {
    let mut events = Vec::new();
    for month in range.start.iter_to(range.end) {
        events.extend(source.events_for_month(month)?);
    }
    events.sort_by_key(|e| e.timestamp);

    match source.first_event_after(range.end)? {
        Some(next) => events.push(next),
        None => {
            let dropped = discard_dangling(&mut events);
            if dropped > 0 {
                debug!(dropped, "discarded dangling open checks");
            }
        }
    }

    Ok(events)
}

/// Rebuilt and redistributed worked time for every month of `range`.
pub fn worked_time(
    source: &dyn EventSource,
    range: MonthRange,
    policy: &MixPolicy,
) -> AppResult<MonthlyDurations> {
    let names = source.category_names()?;
    let events = load_events(source, range)?;

    let monthly = reconstruct(&events, &names)?;

    Ok(monthly
        .into_iter()
        .filter(|(month, _)| range.contains(*month))
        .map(|(month, categories)| (month, redistribute(categories, policy)))
        .filter(|(_, categories)| !categories.is_empty())
        .collect())
}

/// Replace `worker`'s assessments with the worked time found in `source`.
///
/// Nothing is written when a category cannot be resolved; the unresolved
/// names come back in [`IngestOutcome::missing`]. Records outside their
/// project's window are skipped one by one and reported in
/// [`IngestOutcome::bound_errors`].
pub fn ingest_worked_time(
    conn: &mut Connection,
    source: &dyn EventSource,
    worker: &Worker,
    range: MonthRange,
    policy: &MixPolicy,
) -> AppResult<IngestOutcome> {
    let monthly = worked_time(source, range, policy)?;

    let names: BTreeSet<&str> = monthly
        .values()
        .flat_map(|categories| categories.keys().map(String::as_str))
        .collect();

    let projects = match resolve_categories(conn, worker, names)? {
        Resolution::Resolved(projects) => projects,
        Resolution::Unresolved(missing) => {
            warn!(worker = %worker.name, missing = missing.len(), "unresolved categories, nothing ingested");
            return Ok(IngestOutcome {
                missing,
                ..IngestOutcome::default()
            });
        }
    };

    let mut outcome = IngestOutcome::default();

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let deleted = assessments::delete_by_worker(&tx, worker.id)?;
    debug!(worker = %worker.name, deleted, "cleared previous assessments");

    for (month, categories) in &monthly {
        for (name, span) in categories {
            let Some(project) = projects.get(name) else {
                continue;
            };

            if let Err(violation) = check_active_window(project, *month) {
                outcome.bound_errors.push(describe_violation(project, &violation));
                continue;
            }

            assessments::accumulate(&tx, worker.id, project.id, *month, round_to_seconds(*span))?;
            outcome.written += 1;
            outcome.projects.insert(project.id);
        }
    }

    tx.commit()?;

    info!(
        worker = %worker.name,
        range = %range,
        written = outcome.written,
        skipped = outcome.bound_errors.len(),
        "assessments replaced"
    );

    Ok(outcome)
}

/// Ingestion entry point shared by concurrent callers.
///
/// Serializes runs per worker and publishes a refresh once a run commits.
pub struct Ingestor {
    locks: Arc<WorkerLocks>,
    notifier: Option<Notifier>,
    policy: MixPolicy,
}

impl Ingestor {
    pub fn new(locks: Arc<WorkerLocks>, policy: MixPolicy) -> Self {
        Self {
            locks,
            notifier: None,
            policy,
        }
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn run(
        &self,
        conn: &mut Connection,
        source: &dyn EventSource,
        worker: &Worker,
        range: MonthRange,
    ) -> AppResult<IngestOutcome> {
        let lock = self.locks.lock_for(worker.id);
        let outcome = {
            let _guard = acquire(&lock);
            ingest_worked_time(conn, source, worker, range, &self.policy)?
        };

        if outcome.committed()
            && let Some(notifier) = &self.notifier
        {
            notifier.publish(&ForecastRefresh {
                worker_id: worker.id,
                project_ids: outcome.projects.clone(),
            });
        }

        Ok(outcome)
    }

    /// Stop the notifier, waiting for queued refreshes.
    pub fn shutdown(self) {
        if let Some(notifier) = self.notifier {
            notifier.shutdown();
        }
    }
}
