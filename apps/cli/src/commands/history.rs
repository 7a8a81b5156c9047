//! # History Commands
//!
//! ```text
//! history list                         newest first
//! history show <id>                    figures + final amounts
//! history save <export.json> [name]    compute and archive
//! history rename <id> <name>           name and bill date
//! history restore <id> [--out FILE]    back into the stored bill
//! history delete <id>
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use splitbill_core::compute_breakdown;
use splitbill_core::history::default_entry_name;
use splitbill_store::{AppConfig, StoreResult};
use tracing::info;

use super::exchange::write_export;
use super::{bill_date_arg, bill_from_export, SplitArgs};
use crate::render;
use crate::session::Session;

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List archived bills
    List,
    /// Show one archived bill
    Show { id: String },
    /// Compute an export file and archive the result
    Save(SaveArgs),
    /// Rename an archived bill
    Rename {
        id: String,
        name: String,
        /// New bill date (YYYY-MM-DD or DD-MM-YYYY); keeps the current one if omitted
        #[arg(long)]
        date: Option<String>,
    },
    /// Make an archived bill the current one again
    Restore {
        id: String,
        /// Also write the restored bill, orders included, as an export file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete an archived bill
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Export file to archive
    pub file: PathBuf,

    /// Entry name; defaults to "<restaurant> - DD-MM-YYYY"
    pub name: Option<String>,

    /// Bill date (YYYY-MM-DD or DD-MM-YYYY); defaults to today
    #[arg(long)]
    pub date: Option<String>,

    /// Scope the bill to one of the stored restaurants
    #[arg(long)]
    pub restaurant: Option<String>,

    #[command(flatten)]
    pub split: SplitArgs,
}

pub async fn run(command: HistoryCommand, config: &AppConfig, today: NaiveDate) -> StoreResult<()> {
    let mut session = Session::open(config, today).await?;
    let scale = config.engine.minor_units;

    match command {
        HistoryCommand::List => {
            if session.history.is_empty() {
                println!("No saved bills");
            } else {
                println!("{}", render::history_table(session.history.entries(), scale));
            }
        }

        HistoryCommand::Show { id } => {
            let entry = session.history.get(&id)?;
            println!("{}", render::entry_table(entry, scale));
        }

        HistoryCommand::Save(args) => {
            let bill_date = bill_date_arg(args.date.as_deref(), today)?;
            let mut bill = bill_from_export(&args.file, bill_date)?;
            args.split.apply(&mut bill, config.engine.exclude_no_order);

            // Restaurants live in the stored document, not in export files
            bill.restaurants = session.state.restaurants.clone();
            bill.select_restaurant(args.restaurant.as_deref())?;

            let breakdown = compute_breakdown(&bill.to_config(config.validation_mode()))?;
            let name = args
                .name
                .unwrap_or_else(|| default_entry_name(bill.restaurant_name(), bill_date));

            let entry = session
                .history
                .archive(&bill, &breakdown.rounded(scale), &name, bill_date, today)?;
            println!("Saved '{}' ({})", entry.name, entry.id);
            session.commit().await?;
        }

        HistoryCommand::Rename { id, name, date } => {
            let current = session.history.get(&id)?.bill_date;
            let bill_date = bill_date_arg(date.as_deref(), current)?;

            let entry = session.history.rename(&id, &name, bill_date)?;
            println!("Renamed to '{}'", entry.name);
            session.commit().await?;
        }

        HistoryCommand::Restore { id, out } => {
            let restored = session.history.restore(&id)?;
            info!(entry_id = %id, people = restored.people.len(), "Restoring bill");

            if let Some(path) = out {
                write_export(&restored, Some(&path))?;
            }
            session.state = restored;
            println!(
                "Restored {} people and {} menu items",
                session.state.people.len(),
                session.state.menu_items.len()
            );
            session.commit().await?;
        }

        HistoryCommand::Delete { id } => {
            let removed = session.history.remove(&id)?;
            println!("Deleted '{}'", removed.name);
            session.commit().await?;
        }
    }

    session.close().await
}
