use crate::errors::{AppError, AppResult};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

/// Env var that overrides the configured log level.
pub const LOG_ENV: &str = "SEMAFOR_LOG";

/// Install the global tracing subscriber. Diagnostics go to stderr so they
/// never mix with command output.
pub fn init_tracing(level: &str) -> AppResult<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| AppError::Other(err.to_string()))?;

    Ok(())
}
