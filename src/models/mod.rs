pub mod check_event;
pub mod month;
pub mod project;
pub mod transaction;
pub mod work;
pub mod worker;

pub use check_event::CheckEvent;
pub use month::{MonthKey, MonthRange};
pub use project::{MissingProjectAlias, Project, ProjectAlias};
pub use transaction::Transaction;
pub use work::{WorkAssessment, WorkForecast, WorkerDedication};
pub use worker::Worker;
