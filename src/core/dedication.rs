//! Worker dedication and per-worker forecast load.

use crate::models::{MonthKey, WorkForecast, WorkerDedication};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Colour band of a dedication percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Intensity {
    Green,
    Blue,
    Yellow,
    Orange,
    Red,
    Black,
}

impl Intensity {
    pub fn css_class(self) -> &'static str {
        match self {
            Intensity::Green => "dedication-green",
            Intensity::Blue => "dedication-blue",
            Intensity::Yellow => "dedication-yellow",
            Intensity::Orange => "dedication-orange",
            Intensity::Red => "dedication-red",
            Intensity::Black => "dedication-black",
        }
    }
}

/// Band for `dedication / multiplier` (the multiplier is usually the number
/// of workers summed into `dedication`). A zero multiplier counts as one.
pub fn dedication_intensity(dedication: Decimal, multiplier: Decimal) -> Intensity {
    let divisor = if multiplier.is_zero() {
        Decimal::ONE
    } else {
        multiplier
    };
    let d = dedication / divisor;

    if d <= Decimal::from(20) {
        Intensity::Green
    } else if d <= Decimal::from(40) {
        Intensity::Blue
    } else if d <= Decimal::from(60) {
        Intensity::Yellow
    } else if d <= Decimal::from(80) {
        Intensity::Orange
    } else if d <= Decimal::ONE_HUNDRED {
        Intensity::Red
    } else {
        Intensity::Black
    }
}

/// Sum of dedications per month.
pub fn total_dedication(rows: &[WorkerDedication]) -> BTreeMap<MonthKey, Decimal> {
    let mut out = BTreeMap::new();
    for r in rows {
        *out.entry(r.month).or_insert(Decimal::ZERO) += r.dedication;
    }
    out
}

/// A worker's forecast load per month, over all projects and over
/// confirmed projects only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub total: BTreeMap<MonthKey, Decimal>,
    pub confirmed_total: BTreeMap<MonthKey, Decimal>,
}

pub fn worker_forecast_summary(rows: &[WorkForecast]) -> ForecastSummary {
    let mut summary = ForecastSummary::default();
    for r in rows {
        *summary.total.entry(r.month).or_insert(Decimal::ZERO) += r.percentage;
        let confirmed = summary
            .confirmed_total
            .entry(r.month)
            .or_insert(Decimal::ZERO);
        if r.project_confirmed {
            *confirmed += r.percentage;
        }
    }
    summary
}
