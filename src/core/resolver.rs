//! Map worked-time category names to projects.

use crate::db::projects::{find_alias, find_project_by_name, upsert_missing_alias};
use crate::errors::AppResult;
use crate::models::{Project, Worker};
use rusqlite::Connection;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Every name found a project.
    Resolved(BTreeMap<String, Project>),
    /// At least one name did not; nothing is returned for the others.
    Unresolved(BTreeSet<String>),
}

/// Resolve `names` for `worker`: exact project name first, then the worker's
/// aliases. If anything stays unresolved, each unresolved name is recorded as
/// a pending alias request and the whole resolution fails.
pub fn resolve_categories<'a, I>(conn: &Connection, worker: &Worker, names: I) -> AppResult<Resolution>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut resolved = BTreeMap::new();
    let mut missing = BTreeSet::new();

    for name in names {
        if resolved.contains_key(name) || missing.contains(name) {
            continue;
        }

        if let Some(project) = find_project_by_name(conn, name)? {
            resolved.insert(name.to_string(), project);
            continue;
        }

        match find_alias(conn, worker.id, name)? {
            Some(project) => {
                debug!(worker = %worker.name, alias = name, project = %project.name, "resolved via alias");
                resolved.insert(name.to_string(), project);
            }
            None => {
                missing.insert(name.to_string());
            }
        }
    }

    if missing.is_empty() {
        return Ok(Resolution::Resolved(resolved));
    }

    for name in &missing {
        upsert_missing_alias(conn, worker.id, name)?;
    }

    Ok(Resolution::Unresolved(missing))
}
