//! # Retail Intake CLI (`rintake`)
//!
//! The `rintake` binary is the operational interface for Retail Intake.
//! It provides commands for database initialization, batch imports,
//! store statistics, and starting the HTTP intake server.
//!
//! ## Usage
//!
//! ```bash
//! rintake --config ./config/intake.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rintake init` | Create the SQLite database and run schema migrations |
//! | `rintake import --data <file>` | Import one batch from a JSON payload file |
//! | `rintake stats` | Print row counts and photo-reference breakdown |
//! | `rintake serve` | Start the HTTP intake server |
//!
//! ## Examples
//!
//! ```bash
//! # Initialize the database
//! rintake init --config ./config/intake.toml
//!
//! # Import a batch with co-uploaded photos
//! rintake import --data batch.json --photos ./photos
//!
//! # Start the HTTP intake server
//! rintake serve --config ./config/intake.toml
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use retail_intake::{config, import, migrate, server, stats};

/// Retail Intake CLI — a batch import pipeline for retailer records with
/// photo-source resolution.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file.
#[derive(Parser)]
#[command(
    name = "rintake",
    about = "Retail Intake — batch import of retailer records with photo-source resolution",
    version,
    long_about = "Retail Intake ingests batches of retailer records together with uploaded \
    photo binaries, resolves each record's photo reference (co-uploaded file, Drive link, or \
    raw URL) to a canonical stored reference, and persists the records to SQLite with \
    per-row failure isolation."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/intake.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the retailers table.
    /// Idempotent — running it multiple times is safe.
    Init,

    /// Import one batch from a JSON payload file.
    ///
    /// The payload is a JSON array of record objects (or a JSON string
    /// containing one — spreadsheet frontends double-encode). Files in
    /// `--photos` are staged as the batch's uploads, matched against
    /// records by their original filename. Prints a per-batch summary;
    /// a payload that fails to parse aborts the batch with a non-zero
    /// exit before any row is written.
    Import {
        /// Path to the JSON payload file.
        #[arg(long)]
        data: PathBuf,

        /// Directory of photo files uploaded alongside the batch.
        #[arg(long)]
        photos: Option<PathBuf>,
    },

    /// Print row counts and the photo-reference breakdown.
    Stats,

    /// Start the HTTP intake server.
    ///
    /// Binds to `[server].bind` and exposes the import pipeline as a
    /// multipart JSON API, plus static service over the photo storage
    /// area.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Import { data, photos } => {
            import::run_import_file(&cfg, &data, photos.as_deref()).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Serve => {
            init_tracing();
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}

/// Structured logging for the server path. CLI commands keep plain
/// stdout reports.
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,sqlx=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
