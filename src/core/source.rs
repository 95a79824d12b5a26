//! Where check events come from.

use crate::errors::AppResult;
use crate::models::{CheckEvent, MonthKey, MonthRange};
use std::collections::HashMap;

/// Read-only supplier of check events for one ingestion run.
pub trait EventSource {
    /// `category_id → name` (untrimmed, as stored).
    fn category_names(&self) -> AppResult<HashMap<i64, String>>;

    /// Events whose timestamp falls in `month`, ascending.
    fn events_for_month(&self, month: MonthKey) -> AppResult<Vec<CheckEvent>>;

    /// Earliest event strictly after `month`, however many months later.
    fn first_event_after(&self, month: MonthKey) -> AppResult<Option<CheckEvent>>;

    /// First and last month with any event, `None` for an empty source.
    fn month_span(&self) -> AppResult<Option<MonthRange>>;
}

/// Events held in memory, e.g. already decoded by another producer.
#[derive(Debug, Clone, Default)]
pub struct MemoryEvents {
    names: HashMap<i64, String>,
    events: Vec<CheckEvent>,
}

impl MemoryEvents {
    pub fn new(names: HashMap<i64, String>, mut events: Vec<CheckEvent>) -> Self {
        events.sort_by_key(|e| e.timestamp);
        Self { names, events }
    }
}

impl EventSource for MemoryEvents {
    fn category_names(&self) -> AppResult<HashMap<i64, String>> {
        Ok(self.names.clone())
    }

    fn events_for_month(&self, month: MonthKey) -> AppResult<Vec<CheckEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.month() == month)
            .cloned()
            .collect())
    }

    fn first_event_after(&self, month: MonthKey) -> AppResult<Option<CheckEvent>> {
        Ok(self.events.iter().find(|e| e.month() > month).cloned())
    }

    fn month_span(&self) -> AppResult<Option<MonthRange>> {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => Ok(Some(MonthRange::new(first.month(), last.month())?)),
            _ => Ok(None),
        }
    }
}
