use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::economics::{project_balance, rank_projects};
use crate::db::pool::DbPool;
use crate::db::projects::{get_project, list_projects};
use crate::errors::AppResult;
use crate::models::MonthKey;
use crate::ui::messages::{header, info};
use crate::utils::date::current_month;
use crate::utils::formatting::{bold, money, pad_left, pad_right, signed_money};
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::BTreeMap;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Balance {
        project,
        rank,
        json,
    } = cmd
    {
        let pool = DbPool::open_initialized(&cfg.database)?;
        let conn = &pool.conn;
        let rates = cfg.labor_rates();
        let now = current_month();

        if *rank {
            let projects = list_projects(conn, false, false)?;
            let ranked = rank_projects(conn, &projects, &rates, now)?;

            if *json {
                let rows: Vec<_> = ranked
                    .iter()
                    .map(|(p, span)| json!({ "project": p.name, "amount_span": span }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if ranked.is_empty() {
                info("No projects registered.");
            } else {
                header("Projects by financial footprint");
                for (i, (p, span)) in ranked.iter().enumerate() {
                    println!(
                        "{:>3}. {} {}",
                        i + 1,
                        pad_right(&p.name, 32),
                        pad_left(&money(*span), 14)
                    );
                }
            }
            return Ok(());
        }

        if let Some(name) = project {
            let project = get_project(conn, name)?;
            let balance = project_balance(conn, &project, &rates, now)?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&balance)?);
                return Ok(());
            }

            header(format!("Economic balance of {}", project.name));
            if balance.months.is_empty() {
                info("No income or expenses yet.");
                return Ok(());
            }

            println!(
                "{} {} {} {} {}",
                bold(&pad_right("Month", 8)),
                bold(&pad_left("Income", 12)),
                bold(&pad_left("Labor", 12)),
                bold(&pad_left("Other", 12)),
                bold(&pad_left("Balance", 12)),
            );
            for month in &balance.months {
                let running = amount(&balance.balance, month);
                println!(
                    "{} {} {} {} {}",
                    pad_right(&month.to_string(), 8),
                    pad_left(&money(amount(&balance.income, month)), 12),
                    pad_left(&money(amount(&balance.labor_expenses, month)), 12),
                    pad_left(&money(amount(&balance.other_expenses, month)), 12),
                    // escape codes take 9 invisible chars
                    pad_left(&signed_money(running), 21),
                );
            }
            println!(
                "Final balance: {}   footprint: {}",
                signed_money(balance.final_balance()),
                money(balance.amount_span)
            );
        }
    }

    Ok(())
}

fn amount(map: &BTreeMap<MonthKey, Decimal>, month: &MonthKey) -> Decimal {
    map.get(month).copied().unwrap_or(Decimal::ZERO)
}
