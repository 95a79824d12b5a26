//! Aggregate forecast and assessment rows into calendar-month totals.

use crate::models::{MonthKey, WorkAssessment, WorkForecast};
use crate::utils::formatting::secs2readable;
use chrono::TimeDelta;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Add;

/// Monthly totals plus a human readable breakdown per month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkTotals<T> {
    /// Reporting span, ascending and contiguous.
    pub months: Vec<MonthKey>,
    pub totals: BTreeMap<MonthKey, T>,
    pub explanations: BTreeMap<MonthKey, String>,
}

impl<T: Copy> WorkTotals<T> {
    pub fn get(&self, month: MonthKey) -> Option<T> {
        self.totals.get(&month).copied()
    }
}

/// Span for forecasts: earliest forecast month (or now) through now.
/// `start_bound` may only pull the start earlier. Forecasts that all lie in
/// the future still report the current month.
pub fn forecast_span(
    rows: &[WorkForecast],
    now: MonthKey,
    start_bound: Option<MonthKey>,
) -> (MonthKey, MonthKey) {
    let mut start = rows.iter().map(|r| r.month).min().unwrap_or(now).min(now);
    if let Some(bound) = start_bound
        && bound < start
    {
        start = bound;
    }
    (start, now)
}

/// Span for assessments: earliest assessment month (or now) through now + 1.
/// `end_bound` may only push the end later.
pub fn assessment_span(
    rows: &[WorkAssessment],
    now: MonthKey,
    end_bound: Option<MonthKey>,
) -> (MonthKey, MonthKey) {
    let start = rows.iter().map(|r| r.month).min().unwrap_or(now);
    let mut end = now.succ();
    if let Some(bound) = end_bound
        && bound > end
    {
        end = bound;
    }
    (start.min(end), end)
}

pub fn forecast_totals(
    rows: &[WorkForecast],
    now: MonthKey,
    start_bound: Option<MonthKey>,
) -> WorkTotals<Decimal> {
    let span = forecast_span(rows, now, start_bound);
    bucket(
        span,
        rows.iter()
            .map(|r| (r.month, r.worker_name.as_str(), r.percentage)),
        Decimal::ZERO,
        |pct| format!("{}%", pct.normalize()),
    )
}

pub fn assessment_totals(
    rows: &[WorkAssessment],
    now: MonthKey,
    end_bound: Option<MonthKey>,
) -> WorkTotals<TimeDelta> {
    let span = assessment_span(rows, now, end_bound);
    bucket(
        span,
        rows.iter()
            .map(|r| (r.month, r.worker_name.as_str(), r.duration())),
        TimeDelta::zero(),
        |d| secs2readable(d.num_seconds()),
    )
}

/// Zero-fill the span, then add every row. Rows outside the span still
/// get their month in `totals`; they are never dropped.
fn bucket<'a, T, I, F>(span: (MonthKey, MonthKey), rows: I, zero: T, fmt: F) -> WorkTotals<T>
where
    T: Copy + Add<Output = T>,
    I: Iterator<Item = (MonthKey, &'a str, T)>,
    F: Fn(T) -> String,
{
    let (start, end) = span;
    let months: Vec<MonthKey> = start.iter_to(end).collect();

    let mut totals: BTreeMap<MonthKey, T> = months.iter().map(|m| (*m, zero)).collect();
    let mut parts: BTreeMap<MonthKey, Vec<String>> = BTreeMap::new();

    for (month, worker, amount) in rows {
        let slot = totals.entry(month).or_insert(zero);
        *slot = *slot + amount;
        parts
            .entry(month)
            .or_default()
            .push(format!("{}: {}", worker, fmt(amount)));
    }

    let explanations = parts
        .into_iter()
        .map(|(month, lines)| (month, lines.join("\n")))
        .collect();

    WorkTotals {
        months,
        totals,
        explanations,
    }
}
