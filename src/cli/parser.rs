use crate::core::backup::ArchiveFormat;
use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for geoclock
/// CLI application to track GPS-verified working hours with SQLite
#[derive(Parser)]
#[command(
    name = "geoclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Clock in and out of project sites with GPS geofence verification",
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

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/vim/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage projects (the geofenced sites you clock in on)
    Project {
        #[arg(long = "add", help = "Register a new project")]
        add: bool,

        #[arg(long = "list", help = "List registered projects")]
        list: bool,

        #[arg(long = "edit", value_name = "ID", help = "Edit an existing project")]
        edit: Option<i64>,

        #[arg(long = "del", value_name = "ID", help = "Delete a project")]
        del: Option<i64>,

        #[arg(long = "name", help = "Project name")]
        name: Option<String>,

        #[arg(long = "company", help = "Company the project belongs to")]
        company: Option<String>,

        #[arg(long = "address", help = "Street address (informational)")]
        address: Option<String>,

        #[arg(
            long = "coord",
            value_name = "LAT,LON",
            help = "Registered coordinates, e.g. '52.0907,5.1214'"
        )]
        coord: Option<String>,

        #[arg(
            long = "radius",
            value_name = "METERS",
            allow_hyphen_values = true,
            help = "Allowed clock-in/out radius in meters"
        )]
        radius: Option<f64>,

        #[arg(long = "yes", short = 'y', help = "Skip confirmation prompts")]
        yes: bool,
    },

    /// Clock in on a project (captures your position)
    In {
        /// Project id or name
        project: String,

        #[arg(long = "note", help = "Optional note for this session")]
        note: Option<String>,

        #[arg(long = "lat", requires = "lon", help = "Position override: latitude")]
        lat: Option<f64>,

        #[arg(long = "lon", requires = "lat", help = "Position override: longitude")]
        lon: Option<f64>,

        #[arg(long = "accuracy", help = "Position override: accuracy in meters")]
        accuracy: Option<f64>,

        #[arg(long = "yes", short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },

    /// Clock out of the open session (confirmation shows your distance)
    Out {
        #[arg(long = "lat", requires = "lon", help = "Position override: latitude")]
        lat: Option<f64>,

        #[arg(long = "lon", requires = "lat", help = "Position override: longitude")]
        lon: Option<f64>,

        #[arg(long = "accuracy", help = "Position override: accuracy in meters")]
        accuracy: Option<f64>,

        #[arg(long = "yes", short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },

    /// Show the current clock status
    Status,

    /// List recorded sessions
    List {
        #[arg(
            long,
            short,
            help = "Filter by year/month/day or a custom range (default: current month)"
        )]
        period: Option<String>,

        #[arg(long = "summary", help = "Show per-project and grand totals")]
        summary: bool,

        #[arg(long = "gps", help = "Show background position samples")]
        gps: bool,

        #[arg(
            long = "entry",
            value_name = "ID",
            help = "Restrict --gps to one entry"
        )]
        entry: Option<i64>,
    },

    /// Periodically log your position while clocked in
    Track {
        #[arg(
            long = "interval",
            value_name = "MINUTES",
            help = "Sampling interval (default from configuration)"
        )]
        interval: Option<u64>,

        #[arg(long = "once", help = "Take a single sample and exit")]
        once: bool,

        #[arg(long = "lat", requires = "lon", help = "Position override: latitude")]
        lat: Option<f64>,

        #[arg(long = "lon", requires = "lat", help = "Position override: longitude")]
        lon: Option<f64>,
    },

    /// Create a backup snapshot of all data
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, value_enum, help = "Compress the snapshot (zip or targz)")]
        compress: Option<ArchiveFormat>,
    },

    /// Import a backup snapshot (existing rows are never overwritten)
    Restore {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long = "yes", short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },

    /// Export the session report
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}
