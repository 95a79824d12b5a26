//! semafor library root.
//! Exposes the CLI parser, the high-level run() function and the engine
//! modules (check reconstruction, ingestion, totals, project economics).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod logging;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Worker { .. } => cli::commands::worker::handle(&cli.command, cfg),
        Commands::Project { .. } => cli::commands::project::handle(&cli.command, cfg),
        Commands::Alias { .. } => cli::commands::alias::handle(&cli.command, cfg),
        Commands::Forecast { .. } => cli::commands::forecast::handle(&cli.command, cfg),
        Commands::Dedication { .. } => cli::commands::dedication::handle(&cli.command, cfg),
        Commands::Transaction { .. } => cli::commands::transaction::handle(&cli.command, cfg),
        Commands::Ingest { .. } => cli::commands::ingest::handle(&cli.command, cfg),
        Commands::Totals { .. } => cli::commands::totals::handle(&cli.command, cfg),
        Commands::Balance { .. } => cli::commands::balance::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once and shared by every handler
    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    if let Err(e) = logging::init_tracing(&cfg.log_level) {
        eprintln!("warning: logging disabled ({e})");
    }

    dispatch(&cli, &cfg)
}
