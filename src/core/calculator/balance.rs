//! Running economic balance of a project.
//!
//! Real transactions give income and "other" expenses. Labor is costed from
//! assessments for closed months (strictly before the current month) and from
//! forecasts for the current month onwards, so no month is counted twice.

use crate::models::{MonthKey, Transaction, WorkAssessment, WorkForecast};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::BTreeMap;

/// Cost of labor used to price assessments and forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaborRates {
    /// Cost of one assessed hour.
    pub hourly: Decimal,
    /// Cost of one worker at 100% for a whole month.
    pub monthly: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EconomicBalance {
    pub months: Vec<MonthKey>,
    pub balance: BTreeMap<MonthKey, Decimal>,
    pub income: BTreeMap<MonthKey, Decimal>,
    /// Labor plus other expenses, as positive magnitudes.
    pub expenses: BTreeMap<MonthKey, Decimal>,
    pub labor_expenses: BTreeMap<MonthKey, Decimal>,
    pub other_expenses: BTreeMap<MonthKey, Decimal>,
    /// `|Σ income| + |Σ expenses|`, used to rank projects.
    pub amount_span: Decimal,
}

impl EconomicBalance {
    pub fn final_balance(&self) -> Decimal {
        self.balance.values().last().copied().unwrap_or(Decimal::ZERO)
    }
}

pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Assessed labor cost per month, for months before `current`.
pub fn assessed_labor_cost(
    assessments: &[WorkAssessment],
    rates: &LaborRates,
    current: MonthKey,
) -> BTreeMap<MonthKey, Decimal> {
    let mut seconds: BTreeMap<MonthKey, i64> = BTreeMap::new();
    for a in assessments.iter().filter(|a| a.month < current) {
        *seconds.entry(a.month).or_insert(0) += a.duration_secs;
    }

    seconds
        .into_iter()
        .map(|(month, secs)| {
            let hours = Decimal::from(secs) / Decimal::from(3600);
            (month, round_currency(hours * rates.hourly))
        })
        .collect()
}

/// Forecasted labor cost per month, for `current` and later months.
pub fn forecasted_labor_cost(
    forecasts: &[WorkForecast],
    rates: &LaborRates,
    current: MonthKey,
) -> BTreeMap<MonthKey, Decimal> {
    let mut percentages: BTreeMap<MonthKey, Decimal> = BTreeMap::new();
    for f in forecasts.iter().filter(|f| f.month >= current) {
        *percentages.entry(f.month).or_insert(Decimal::ZERO) += f.percentage;
    }

    percentages
        .into_iter()
        .map(|(month, pct)| {
            let share = pct / Decimal::ONE_HUNDRED;
            (month, round_currency(share * rates.monthly))
        })
        .collect()
}

/// Assessed and forecasted labor cost merged into one map.
pub fn labor_costs(
    assessments: &[WorkAssessment],
    forecasts: &[WorkForecast],
    rates: &LaborRates,
    current: MonthKey,
) -> BTreeMap<MonthKey, Decimal> {
    let mut labor = assessed_labor_cost(assessments, rates, current);
    for (month, cost) in forecasted_labor_cost(forecasts, rates, current) {
        *labor.entry(month).or_insert(Decimal::ZERO) += cost;
    }
    labor
}

/// Merge transactions and labor cost into a running balance.
///
/// The reporting span runs from the first to the last month that has any
/// income or expense; months in between without movements carry the
/// previous balance.
pub fn economic_balance(
    transactions: &[Transaction],
    labor: &BTreeMap<MonthKey, Decimal>,
) -> EconomicBalance {
    let mut income: BTreeMap<MonthKey, Decimal> = BTreeMap::new();
    let mut other: BTreeMap<MonthKey, Decimal> = BTreeMap::new();

    for t in transactions {
        if t.amount.is_zero() {
            continue;
        }
        if t.amount.is_sign_positive() {
            *income.entry(t.month()).or_insert(Decimal::ZERO) += t.amount;
        } else {
            *other.entry(t.month()).or_insert(Decimal::ZERO) += t.amount.abs();
        }
    }

    let labor_expenses: BTreeMap<MonthKey, Decimal> = labor
        .iter()
        .filter(|(_, cost)| !cost.is_zero())
        .map(|(m, c)| (*m, *c))
        .collect();

    let mut expenses = other.clone();
    for (month, cost) in &labor_expenses {
        *expenses.entry(*month).or_insert(Decimal::ZERO) += *cost;
    }

    let first = income.keys().chain(expenses.keys()).min().copied();
    let last = income.keys().chain(expenses.keys()).max().copied();

    let months: Vec<MonthKey> = match (first, last) {
        (Some(f), Some(l)) => f.iter_to(l).collect(),
        _ => Vec::new(),
    };

    let mut balance = BTreeMap::new();
    let mut running = Decimal::ZERO;
    for month in &months {
        let inc = income.get(month).copied().unwrap_or(Decimal::ZERO);
        let exp = expenses.get(month).copied().unwrap_or(Decimal::ZERO);
        running = running + inc - exp;
        balance.insert(*month, running);
    }

    let total_income: Decimal = income.values().copied().sum();
    let total_expenses: Decimal = expenses.values().copied().sum();

    EconomicBalance {
        months,
        balance,
        income,
        expenses,
        labor_expenses,
        other_expenses: other,
        amount_span: total_income.abs() + total_expenses.abs(),
    }
}
