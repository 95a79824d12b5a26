use super::month::MonthKey;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub date_start: NaiveDate, // ⇔ projects.date_start (TEXT "YYYY-MM-DD")
    pub date_end: NaiveDate,   // ⇔ projects.date_end   (TEXT "YYYY-MM-DD")
    pub confirmed: bool,
    pub archived: bool,
}

impl Project {
    pub fn first_month(&self) -> MonthKey {
        MonthKey::of(self.date_start)
    }

    pub fn last_month(&self) -> MonthKey {
        MonthKey::of(self.date_end)
    }
}

/// Worker-scoped alternative name for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectAlias {
    pub id: i64,
    pub worker_id: i64,
    pub alias: String,
    pub project_id: i64,
}

/// Category name seen during ingestion that nothing maps to yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingProjectAlias {
    pub id: i64,
    pub worker_id: i64,
    pub alias: String,
}
