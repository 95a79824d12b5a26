use super::month::MonthKey;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Real bank movement booked against a project. Positive is income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub project_id: i64,
    pub date: NaiveDate,
    pub concept: String,
    pub amount: Decimal,
}

impl Transaction {
    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.date)
    }
}
