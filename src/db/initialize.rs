use crate::db::migrate::{current_version, latest_version, run_pending_migrations};
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use tracing::debug;

/// Bring the schema up to date and check the result.
///
/// A database written by a newer semafor (higher schema version than this
/// binary knows) is refused instead of being used half-understood.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;

    let (current, latest) = (current_version(conn)?, latest_version());
    if current > latest {
        return Err(AppError::Migration(format!(
            "database schema v{current} is newer than supported v{latest}"
        )));
    }

    debug!(schema_version = current, "database ready");
    Ok(())
}
