use super::month::MonthKey;
use chrono::NaiveDateTime;
use serde::Serialize;

/// A single attendance check as exported by the device-sync app.
///
/// A check with a category opens (or switches) work on that category;
/// a check without category closes the current interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckEvent {
    pub timestamp: NaiveDateTime,
    pub category_id: Option<i64>,
    pub multiplier: u8, // 0..=100, percentage of the interval that counts
}

impl CheckEvent {
    pub fn new(timestamp: NaiveDateTime, category_id: Option<i64>, multiplier: u8) -> Self {
        Self {
            timestamp,
            category_id,
            multiplier,
        }
    }

    /// Close check (no category, full multiplier).
    pub fn close(timestamp: NaiveDateTime) -> Self {
        Self::new(timestamp, None, 100)
    }

    pub fn is_open(&self) -> bool {
        self.category_id.is_some()
    }

    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.timestamp.date())
    }
}
