//! StrengthLog CLI
//!
//! Command-line front end for the StrengthLog workout log.
//!
//! # Commands
//!
//! - `add`, `edit` - Create or change a workout
//! - `list`, `show` - Read workouts, optionally refreshing from the remote
//! - `complete`, `activate` - Flip a workout's completion state
//! - `delete`, `clear-completed`, `delete-all` - Remove workouts
//! - `refresh` - Replace local workouts with the remote copy
//! - `stats` - Active/completed percentages
//! - `compact` - Rewrite the local journal

mod commands;

use clap::{Parser, Subcommand};
use commands::{Context, OutputFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use strengthlog_core::{WorkoutTable, WorkoutsFilterType};
use strengthlog_sync::{
    BackgroundScope, DefaultWorkoutRepository, NetworkConfig, WorkoutNetworkDataSource,
};
use tracing_subscriber::EnvFilter;

/// Directory used when `--path` is not given.
const DEFAULT_DATA_DIR: &str = "strengthlog-data";

/// Journal file name inside the data directory.
const JOURNAL_FILE: &str = "workouts.journal";

/// Upper bound on waiting for background pushes before exiting.
const PUSH_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// StrengthLog offline-first workout log.
#[derive(Parser)]
#[command(name = "strengthlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the data directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Simulated remote latency in milliseconds
    #[arg(global = true, long, default_value_t = 2000)]
    latency_ms: u64,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Output format
    #[arg(global = true, short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a workout
    Add {
        /// Workout title
        title: String,
        /// Workout description
        #[arg(default_value = "")]
        description: String,
    },

    /// Change a workout's title and description
    Edit {
        /// Workout id
        id: String,
        /// New title
        title: String,
        /// New description
        #[arg(default_value = "")]
        description: String,
    },

    /// List workouts
    List {
        /// Which workouts to show (all, active, completed)
        #[arg(long, default_value = "all")]
        filter: WorkoutsFilterType,

        /// Pull from the remote first
        #[arg(short, long)]
        refresh: bool,
    },

    /// Show one workout
    Show {
        /// Workout id
        id: String,

        /// Pull from the remote first
        #[arg(short, long)]
        refresh: bool,
    },

    /// Mark a workout completed
    Complete {
        /// Workout id
        id: String,
    },

    /// Mark a workout active
    Activate {
        /// Workout id
        id: String,
    },

    /// Delete a workout
    Delete {
        /// Workout id
        id: String,
    },

    /// Delete all completed workouts
    ClearCompleted,

    /// Delete every workout
    DeleteAll,

    /// Replace local workouts with the remote copy
    Refresh,

    /// Show active/completed percentages
    Stats {
        /// Pull from the remote first
        #[arg(short, long)]
        refresh: bool,
    },

    /// Rewrite the local journal to drop superseded records
    Compact,

    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so `--format json` output stays parseable
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("error: failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", commands::describe(err.as_ref()));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Commands::Version = cli.command {
        println!("StrengthLog CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("StrengthLog Core v{}", strengthlog_core::VERSION);
        return Ok(());
    }

    let dir = cli
        .path
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let table = Arc::new(WorkoutTable::open(&dir.join(JOURNAL_FILE))?);
    let network = Arc::new(WorkoutNetworkDataSource::new(
        NetworkConfig::new().with_latency(Duration::from_millis(cli.latency_ms)),
    ));
    let scope = BackgroundScope::current();
    let repository = DefaultWorkoutRepository::new(network, table.clone(), scope.clone());

    let ctx = Context {
        repository: &repository,
        table: &table,
        format: cli.format,
    };
    let result = dispatch(&ctx, cli.command).await;

    let pending = scope.drain(PUSH_DRAIN_TIMEOUT).await;
    if pending > 0 {
        tracing::warn!(pending, "exiting with pushes still in flight");
    }
    result
}

async fn dispatch(ctx: &Context<'_>, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Add { title, description } => {
            commands::workouts::add(ctx, &title, &description).await
        }
        Commands::Edit {
            id,
            title,
            description,
        } => commands::workouts::edit(ctx, &id, &title, &description).await,
        Commands::List { filter, refresh } => commands::workouts::list(ctx, filter, refresh).await,
        Commands::Show { id, refresh } => commands::workouts::show(ctx, &id, refresh).await,
        Commands::Complete { id } => commands::workouts::set_completed(ctx, &id, true).await,
        Commands::Activate { id } => commands::workouts::set_completed(ctx, &id, false).await,
        Commands::Delete { id } => commands::workouts::delete(ctx, &id).await,
        Commands::ClearCompleted => commands::workouts::clear_completed(ctx).await,
        Commands::DeleteAll => commands::workouts::delete_all(ctx).await,
        Commands::Refresh => commands::workouts::refresh(ctx).await,
        Commands::Stats { refresh } => commands::stats::run(ctx, refresh).await,
        Commands::Compact => commands::compact::run(ctx),
        Commands::Version => Ok(()),
    }
}
