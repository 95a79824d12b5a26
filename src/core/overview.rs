use crate::db::forecasts;
use crate::errors::AppResult;
use crate::models::{MonthKey, MonthRange, Project, Worker};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Months from the earliest project start to the latest project end.
pub fn projects_time_span(projects: &[Project]) -> Option<MonthRange> {
    let start = projects.iter().map(Project::first_month).min()?;
    let end = projects.iter().map(Project::last_month).max()?;
    MonthRange::new(start, end).ok()
}

/// Forecast percentage per month summed over `projects`.
pub fn total_forecast(
    conn: &Connection,
    projects: &[Project],
    worker: Option<&Worker>,
) -> AppResult<BTreeMap<MonthKey, Decimal>> {
    let mut out = BTreeMap::new();
    for p in projects {
        for row in forecasts::for_project(conn, p.id, worker.map(|w| w.id))? {
            *out.entry(row.month).or_insert(Decimal::ZERO) += row.percentage;
        }
    }
    Ok(out)
}
