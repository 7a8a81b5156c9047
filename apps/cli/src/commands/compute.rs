//! `splitbill compute`: breakdown of an export file, no database involved.

use std::path::PathBuf;

use clap::Args;
use splitbill_core::{compute_breakdown, ValidationMode};
use splitbill_store::{AppConfig, StoreResult};
use tracing::info;

use super::{bill_from_export, scoped_config, SplitArgs};
use crate::render;

#[derive(Debug, Args)]
pub struct ComputeArgs {
    /// Export file to split
    pub file: PathBuf,

    /// Only count menu items from this restaurant
    #[arg(long)]
    pub restaurant: Option<String>,

    /// Reject out-of-range tax rates and negative amounts instead of clamping
    #[arg(long)]
    pub strict: bool,

    /// Also list what each person ordered
    #[arg(long)]
    pub items: bool,

    /// Print the breakdown as JSON, rounded to the configured minor units
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub split: SplitArgs,
}

pub fn run(args: ComputeArgs, config: &AppConfig, today: chrono::NaiveDate) -> StoreResult<()> {
    let mut state = bill_from_export(&args.file, today)?;
    args.split.apply(&mut state, config.engine.exclude_no_order);

    let mode = if args.strict {
        ValidationMode::Strict
    } else {
        config.validation_mode()
    };
    let bill = scoped_config(&state, mode, args.restaurant.as_deref());
    let breakdown = compute_breakdown(&bill)?;

    info!(
        people = breakdown.people.len(),
        total = %breakdown.total_bill,
        "Computed breakdown"
    );

    let scale = config.engine.minor_units;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&breakdown.rounded(scale))?);
        return Ok(());
    }

    println!("{}", render::breakdown_table(&breakdown, scale));
    println!("{}", render::totals_table(&breakdown, scale));
    if args.items {
        println!("{}", render::items_table(&bill, &breakdown, scale));
    }

    Ok(())
}
