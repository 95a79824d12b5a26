use crate::core::calculator::balance::{EconomicBalance, LaborRates, economic_balance, labor_costs};
use crate::db::{assessments, forecasts, transactions};
use crate::errors::AppResult;
use crate::models::{MonthKey, Project};
use rusqlite::Connection;
use rust_decimal::Decimal;

/// Running balance of `project` as of `current` month.
pub fn project_balance(
    conn: &Connection,
    project: &Project,
    rates: &LaborRates,
    current: MonthKey,
) -> AppResult<EconomicBalance> {
    let txs = transactions::for_project(conn, project.id)?;
    let assessed = assessments::for_project(conn, project.id, None)?;
    let forecast = forecasts::for_project(conn, project.id, None)?;

    let labor = labor_costs(&assessed, &forecast, rates, current);
    Ok(economic_balance(&txs, &labor))
}

/// Projects ordered by financial footprint (`amount_span`), largest first.
/// Ties keep name order.
pub fn rank_projects(
    conn: &Connection,
    projects: &[Project],
    rates: &LaborRates,
    current: MonthKey,
) -> AppResult<Vec<(Project, Decimal)>> {
    let mut ranked = Vec::with_capacity(projects.len());
    for p in projects {
        let balance = project_balance(conn, p, rates, current)?;
        ranked.push((p.clone(), balance.amount_span));
    }
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(ranked)
}
