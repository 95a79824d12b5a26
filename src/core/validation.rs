use crate::models::{MonthKey, Project};
use thiserror::Error;

/// An assessment month outside the project's active window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("month {month} is outside the project window {first}..{last}")]
pub struct OutOfBoundsError {
    pub month: MonthKey,
    pub first: MonthKey,
    pub last: MonthKey,
}

/// Month-granularity check of `month` against `[date_start, date_end]`.
pub fn check_active_window(project: &Project, month: MonthKey) -> Result<(), OutOfBoundsError> {
    let (first, last) = (project.first_month(), project.last_month());
    if month < first || month > last {
        return Err(OutOfBoundsError { month, first, last });
    }
    Ok(())
}

/// The string reported back to the caller for a skipped record.
pub fn describe_violation(project: &Project, err: &OutOfBoundsError) -> String {
    format!("{} ({}): {}", project.name, err.month, err)
}
