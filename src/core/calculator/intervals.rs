//! Rebuild worked-time intervals from the raw check stream.
//!
//! Every check with a category opens an interval that the next check closes,
//! whatever that next check is. The interval is weighted by the opening
//! check's multiplier and credited to the month of the opening check, even
//! when the closing check lies in the following month.

use crate::errors::{AppError, AppResult};
use crate::models::{CheckEvent, MonthKey};
use chrono::TimeDelta;
use std::collections::{BTreeMap, HashMap};

/// `category name → worked time` for a single month.
pub type CategoryDurations = BTreeMap<String, TimeDelta>;

/// Worked time per month, per category.
pub type MonthlyDurations = BTreeMap<MonthKey, CategoryDurations>;

/// Drop trailing open checks (a category with nothing closing it).
///
/// Repeats until the stream ends with a close check, so a dangling
/// switch A → B at the very end loses both A and B.
pub fn discard_dangling(events: &mut Vec<CheckEvent>) -> usize {
    let mut dropped = 0;
    while events.last().is_some_and(CheckEvent::is_open) {
        events.pop();
        dropped += 1;
    }
    dropped
}

/// Weighted length of the interval opened by `start` and closed by `end`.
pub fn weighted_span(start: &CheckEvent, end: &CheckEvent) -> TimeDelta {
    (end.timestamp - start.timestamp) * i32::from(start.multiplier) / 100
}

/// Bucket an ascending check stream into monthly category durations.
///
/// `names` maps category ids to their display names; names are trimmed
/// before being used as bucket keys.
pub fn reconstruct(
    events: &[CheckEvent],
    names: &HashMap<i64, String>,
) -> AppResult<MonthlyDurations> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|e| e.timestamp);

    let mut out = MonthlyDurations::new();

    for pair in sorted.windows(2) {
        let (start, end) = (&pair[0], &pair[1]);

        let Some(category_id) = start.category_id else {
            continue;
        };

        let name = names
            .get(&category_id)
            .ok_or(AppError::UnknownCategory(category_id))?
            .trim()
            .to_string();

        let span = weighted_span(start, end);

        *out.entry(start.month())
            .or_default()
            .entry(name)
            .or_insert_with(TimeDelta::zero) += span;
    }

    Ok(out)
}

/// Convenience wrapper for a stream that belongs to one month only.
pub fn reconstruct_month(
    events: &[CheckEvent],
    names: &HashMap<i64, String>,
) -> AppResult<CategoryDurations> {
    let monthly = reconstruct(events, names)?;
    let mut merged = CategoryDurations::new();
    for (_, categories) in monthly {
        for (name, span) in categories {
            *merged.entry(name).or_insert_with(TimeDelta::zero) += span;
        }
    }
    Ok(merged)
}

/// Round to whole seconds, half away from zero.
pub fn round_to_seconds(span: TimeDelta) -> i64 {
    let secs = span.num_seconds();
    let nanos = span.subsec_nanos() as i64;
    if nanos >= 500_000_000 {
        secs + 1
    } else if nanos <= -500_000_000 {
        secs - 1
    } else {
        secs
    }
}
