use clap::{Parser, Subcommand};

/// Command-line interface definition for semafor
#[derive(Parser)]
#[command(
    name = "semafor",
    version = env!("CARGO_PKG_VERSION"),
    about = "Turn attendance checks into monthly project assessments and follow project economics",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show the configuration in use
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Register or list workers
    Worker {
        #[arg(long, value_name = "NAME", help = "Register a new worker")]
        add: Option<String>,

        #[arg(long, help = "List all workers")]
        list: bool,
    },

    /// Register, flag or list projects
    Project {
        #[arg(long, value_name = "NAME", requires_all = ["start", "end"], help = "Register a new project")]
        add: Option<String>,

        /// First active month (YYYY-MM or YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Last active month (YYYY-MM or YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// Mark the new project as confirmed
        #[arg(long, requires = "add")]
        confirmed: bool,

        #[arg(long, value_name = "NAME", help = "Mark an existing project as confirmed")]
        confirm: Option<String>,

        #[arg(long, value_name = "NAME", help = "Archive an existing project")]
        archive: Option<String>,

        #[arg(long, help = "List projects")]
        list: bool,

        /// With --list, include archived projects
        #[arg(long, requires = "list")]
        all: bool,

        #[arg(long, help = "Show the active span and monthly forecast load of active projects")]
        overview: bool,

        /// With --overview, only count this worker's forecasts
        #[arg(long, requires = "overview")]
        worker: Option<String>,
    },

    /// Map a worker's check category name to a project
    Alias {
        /// Worker the alias belongs to
        #[arg(long)]
        worker: Option<String>,

        #[arg(long, value_name = "ALIAS", requires_all = ["worker", "project"], help = "Category name to map")]
        add: Option<String>,

        /// Target project of the alias
        #[arg(long)]
        project: Option<String>,

        #[arg(long, help = "List pending (missing) aliases")]
        missing: bool,

        #[arg(long, requires = "worker", help = "List aliases of the worker")]
        list: bool,
    },

    /// Set a forecast percentage or show a worker's forecast load
    Forecast {
        #[arg(long)]
        worker: String,

        #[arg(long, requires_all = ["month", "set"])]
        project: Option<String>,

        /// Month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,

        /// Percentage 0..100
        #[arg(long, value_name = "PCT")]
        set: Option<String>,

        #[arg(long, help = "Show total and confirmed-only forecast per month")]
        summary: bool,
    },

    /// Set or list worker dedications
    Dedication {
        #[arg(long)]
        worker: Option<String>,

        /// Month (YYYY-MM)
        #[arg(long, requires_all = ["worker", "set"])]
        month: Option<String>,

        /// Dedication percentage
        #[arg(long, value_name = "PCT")]
        set: Option<String>,

        #[arg(long, help = "List dedications with their intensity band")]
        list: bool,
    },

    /// Record a bank transaction for a project
    Transaction {
        #[arg(long)]
        project: String,

        /// Value date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Signed amount: positive is income, negative is expense
        #[arg(long, allow_hyphen_values = true)]
        amount: String,

        #[arg(long, default_value = "")]
        concept: String,
    },

    /// Import a worker's check file and regenerate their assessments
    Ingest {
        #[arg(long)]
        worker: String,

        /// SQLite export of the attendance app
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Months to ingest: YYYY-MM or YYYY-MM:YYYY-MM (default: every month in the file)
        #[arg(long, short)]
        period: Option<String>,
    },

    /// Monthly forecast (default) or assessment totals of a project
    Totals {
        #[arg(long)]
        project: String,

        /// Restrict to one worker
        #[arg(long)]
        worker: Option<String>,

        /// Show assessed time instead of forecast percentages
        #[arg(long)]
        assessments: bool,

        /// Start the forecast span no later than this month (YYYY-MM)
        #[arg(long, conflicts_with = "assessments")]
        from: Option<String>,

        /// End the assessment span no earlier than this month (YYYY-MM)
        #[arg(long, requires = "assessments")]
        until: Option<String>,

        #[arg(long, help = "Print JSON instead of a table")]
        json: bool,
    },

    /// Economic balance of a project, or rank all projects by footprint
    Balance {
        #[arg(long, required_unless_present = "rank")]
        project: Option<String>,

        #[arg(long, help = "Rank projects by income + expenses")]
        rank: bool,

        #[arg(long, help = "Print JSON instead of a table")]
        json: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
