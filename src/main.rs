//! # Planning ETL CLI (`petl`)
//!
//! The `petl` binary drives the ingestion pipeline and gives an operator a
//! thin admin surface over its outputs.
//!
//! ## Usage
//!
//! ```bash
//! petl --config ./petl.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `petl run` | Run a full ingestion pass over the source list |
//! | `petl sources list` | Print the monitored URLs |
//! | `petl sources add <url>` | Add a URL to the source list |
//! | `petl sources remove <url>` | Remove a URL from the source list |
//! | `petl records list` | Table of normalized records on disk |
//! | `petl records show <id>` | Print one record with a first-chunk preview |
//! | `petl changelog` | Tail the changelog |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use planning_etl::{admin, config, pipeline};

/// Planning ETL — change-aware ingestion for planning-scheme documents.
#[derive(Parser)]
#[command(
    name = "petl",
    about = "Planning ETL — change-aware ingestion for planning-scheme documents",
    version,
    long_about = "Planning ETL fetches a configured list of planning-scheme URLs (HTML and \
    PDF), extracts plain text, chunks it, and writes one normalized JSON record per source, \
    updating only when the content hash has changed."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./petl.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full ingestion pass over the configured source list.
    ///
    /// Fetches each URL in order, persists the raw artifact, extracts and
    /// normalizes the text, and writes the record plus a changelog line only
    /// when the content has changed. One URL's failure never stops the rest.
    Run,

    /// Manage the monitored source list.
    Sources {
        #[command(subcommand)]
        action: SourcesAction,
    },

    /// Browse normalized records.
    Records {
        #[command(subcommand)]
        action: RecordsAction,
    },

    /// Tail the changelog of write events.
    Changelog {
        /// Number of trailing lines to show.
        #[arg(short = 'n', long, default_value_t = 50)]
        lines: usize,
    },
}

#[derive(Subcommand)]
enum SourcesAction {
    /// Print the monitored URLs in processing order.
    List,
    /// Append a URL to the source list.
    Add {
        /// URL to monitor.
        url: String,
    },
    /// Remove a URL from the source list.
    Remove {
        /// URL to stop monitoring.
        url: String,
    },
}

#[derive(Subcommand)]
enum RecordsAction {
    /// Table of normalized records: file, date, chunk count, hash, source.
    List,
    /// Print one record's metadata, chunk inventory, and first-chunk preview.
    Show {
        /// Record identifier (the filename stem, e.g. `example_org_scheme`).
        id: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Run => {
            let summary = pipeline::run(&cfg)?;
            println!("run complete");
            println!("  processed: {}", summary.processed);
            println!("  updated:   {}", summary.updated);
            println!("  unchanged: {}", summary.unchanged);
            println!("  skipped:   {}", summary.skipped_empty);
            println!("  failed:    {}", summary.failed);
        }
        Commands::Sources { action } => match action {
            SourcesAction::List => admin::list_sources(&cfg)?,
            SourcesAction::Add { url } => admin::add_source(&cfg, &url)?,
            SourcesAction::Remove { url } => admin::remove_source(&cfg, &url)?,
        },
        Commands::Records { action } => match action {
            RecordsAction::List => admin::list_records(&cfg)?,
            RecordsAction::Show { id } => admin::show_record(&cfg, &id)?,
        },
        Commands::Changelog { lines } => {
            admin::tail_changelog(&cfg, lines)?;
        }
    }

    Ok(())
}
