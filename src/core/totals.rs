use crate::core::calculator::buckets::{WorkTotals, assessment_totals, forecast_totals};
use crate::db::{assessments, forecasts};
use crate::errors::AppResult;
use crate::models::{MonthKey, Project, Worker};
use chrono::TimeDelta;
use rusqlite::Connection;
use rust_decimal::Decimal;

/// Forecast percentages of `project` per month.
pub fn project_forecast_totals(
    conn: &Connection,
    project: &Project,
    worker: Option<&Worker>,
    now: MonthKey,
    start_bound: Option<MonthKey>,
) -> AppResult<WorkTotals<Decimal>> {
    let rows = forecasts::for_project(conn, project.id, worker.map(|w| w.id))?;
    Ok(forecast_totals(&rows, now, start_bound))
}

/// Assessed time of `project` per month.
pub fn project_assessment_totals(
    conn: &Connection,
    project: &Project,
    worker: Option<&Worker>,
    now: MonthKey,
    end_bound: Option<MonthKey>,
) -> AppResult<WorkTotals<TimeDelta>> {
    let rows = assessments::for_project(conn, project.id, worker.map(|w| w.id))?;
    Ok(assessment_totals(&rows, now, end_bound))
}
