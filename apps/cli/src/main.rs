//! # splitbill
//!
//! Command-line front end for Split Bill.
//!
//! ## Usage
//! ```bash
//! # Split an exported bill
//! splitbill compute dinner.json --tax-after --restaurant r-1
//!
//! # Keep people and menu items for next time
//! splitbill import dinner.json
//!
//! # Archive a bill and browse the archive
//! splitbill history save dinner.json "Friday dinner" --date 2024-06-01
//! splitbill history list
//! ```
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show debug messages
//! - Default: `info,splitbill=debug,sqlx=warn`

mod commands;
mod render;
mod session;

use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use splitbill_store::AppConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::commands::compute::ComputeArgs;
use crate::commands::history::HistoryCommand;
use crate::commands::restaurant::RestaurantCommand;

#[derive(Debug, Parser)]
#[command(name = "splitbill", version, about = "Split a shared restaurant bill")]
struct Cli {
    /// Config file (defaults to splitbill.toml in the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the per-person breakdown of an export file
    Compute(ComputeArgs),
    /// Load an export file into the stored bill
    Import {
        /// Export file to load
        file: PathBuf,
    },
    /// Write the stored bill as an export file
    Export {
        /// Output file; prints to stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Archived bills
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
    /// Stored restaurants
    Restaurant {
        #[command(subcommand)]
        command: RestaurantCommand,
    },
}

/// Installs the tracing subscriber. `RUST_LOG` wins over the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,splitbill=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config)?;
    let today = Local::now().date_naive();

    info!(
        user_id = %config.user_id(),
        database = %config.storage.database_path.display(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Compute(args) => commands::compute::run(args, &config, today)?,
        Commands::Import { file } => commands::exchange::import(&file, &config, today).await?,
        Commands::Export { out } => commands::exchange::export_current(out, &config, today).await?,
        Commands::History { command } => commands::history::run(command, &config, today).await?,
        Commands::Restaurant { command } => {
            commands::restaurant::run(command, &config, today).await?
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_history_save() {
        let cli = Cli::parse_from([
            "splitbill",
            "history",
            "save",
            "dinner.json",
            "Friday dinner",
            "--date",
            "01-06-2024",
            "--tax-after",
        ]);

        match cli.command {
            Commands::History {
                command: HistoryCommand::Save(args),
            } => {
                assert_eq!(args.name.as_deref(), Some("Friday dinner"));
                assert_eq!(args.date.as_deref(), Some("01-06-2024"));
                assert!(args.split.tax_after);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
