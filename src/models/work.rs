use super::month::MonthKey;
use chrono::TimeDelta;
use rust_decimal::Decimal;
use serde::Serialize;

/// Measured time a worker spent on a project in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkAssessment {
    pub worker_id: i64,
    pub worker_name: String,
    pub project_id: i64,
    pub month: MonthKey,
    pub duration_secs: i64, // ⇔ work_assessments.duration_secs
}

impl WorkAssessment {
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::seconds(self.duration_secs)
    }
}

/// Planned share (percentage of full time) of a worker on a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkForecast {
    pub worker_id: i64,
    pub worker_name: String,
    pub project_id: i64,
    pub project_confirmed: bool,
    pub month: MonthKey,
    pub percentage: Decimal, // 0..=100
}

/// Percentage of a worker's available time reserved in a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerDedication {
    pub worker_id: i64,
    pub month: MonthKey,
    pub dedication: Decimal,
}
