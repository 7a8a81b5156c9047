//! # Commands
//!
//! One module per top-level subcommand.
//!
//! ```text
//! splitbill compute <export.json>     ──► compute.rs   (no database)
//! splitbill import <file>             ──► exchange.rs
//! splitbill export [--out FILE]       ──► exchange.rs
//! splitbill history <list|show|...>   ──► history.rs
//! splitbill restaurant <list|add|...> ──► restaurant.rs
//! ```

pub mod compute;
pub mod exchange;
pub mod history;
pub mod restaurant;

use std::path::Path;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use splitbill_core::exchange::parse_import;
use splitbill_core::{BillConfig, BillState, CoreError, Distribution, TaxMethod};
use splitbill_store::StoreResult;
use tracing::debug;

/// Distribution policy as written on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SplitArg {
    Equal,
    Proportional,
}

impl From<SplitArg> for Distribution {
    fn from(arg: SplitArg) -> Self {
        match arg {
            SplitArg::Equal => Distribution::Equal,
            SplitArg::Proportional => Distribution::Proportional,
        }
    }
}

/// How bill-wide amounts are shared. Export files carry the amounts but
/// not the policies.
#[derive(Debug, Clone, Args)]
pub struct SplitArgs {
    /// Levy tax on shipping and other costs too
    #[arg(long)]
    pub tax_after: bool,

    /// How the discount is shared
    #[arg(long, value_enum, default_value = "proportional")]
    pub discount_split: SplitArg,

    /// How the tax is shared
    #[arg(long, value_enum, default_value = "equal")]
    pub tax_split: SplitArg,

    /// How shipping is shared
    #[arg(long, value_enum, default_value = "equal")]
    pub shipping_split: SplitArg,

    /// How other costs are shared
    #[arg(long, value_enum, default_value = "equal")]
    pub other_split: SplitArg,

    /// Also charge people who ordered nothing
    #[arg(long)]
    pub include_everyone: bool,
}

impl SplitArgs {
    /// Writes the policies into a bill's settings.
    pub fn apply(&self, state: &mut BillState, exclude_by_default: bool) {
        let settings = &mut state.settings;
        settings.discount.distribution = self.discount_split.into();
        settings.tax.distribution = self.tax_split.into();
        settings.shipping.distribution = self.shipping_split.into();
        settings.other.distribution = self.other_split.into();
        settings.tax.method = if self.tax_after {
            TaxMethod::After
        } else {
            TaxMethod::Before
        };
        settings.exclude_no_order = exclude_by_default && !self.include_everyone;
    }
}

/// Reads an export file into a fresh bill dated `bill_date`.
pub fn bill_from_export(path: &Path, bill_date: NaiveDate) -> StoreResult<BillState> {
    let json = std::fs::read_to_string(path)?;
    let document = parse_import(&json)?;
    debug!(path = %path.display(), "Parsed export file");

    let mut state = BillState::new(bill_date);
    state.apply_import(document);
    Ok(state)
}

/// Parses an optional `--date` argument, falling back to `default`.
pub fn bill_date_arg(value: Option<&str>, default: NaiveDate) -> StoreResult<NaiveDate> {
    match value {
        Some(value) => splitbill_core::validation::parse_bill_date(value)
            .map_err(|e| CoreError::from(e).into()),
        None => Ok(default),
    }
}

/// Engine input for a bill, optionally scoped to one restaurant.
pub fn scoped_config(
    state: &BillState,
    mode: splitbill_core::ValidationMode,
    restaurant: Option<&str>,
) -> BillConfig {
    let config = state.to_config(mode);
    match restaurant {
        Some(id) => config.with_scope(id),
        None => config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        split: SplitArgs,
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_split_defaults_match_fresh_bill() {
        let args = Harness::parse_from(["test"]).split;
        let mut state = BillState::new(today());
        let fresh = state.settings.clone();

        args.apply(&mut state, true);
        assert_eq!(state.settings, fresh);
    }

    #[test]
    fn test_split_flags() {
        let args = Harness::parse_from([
            "test",
            "--tax-after",
            "--discount-split",
            "equal",
            "--shipping-split",
            "proportional",
            "--include-everyone",
        ])
        .split;
        let mut state = BillState::new(today());

        args.apply(&mut state, true);
        assert_eq!(state.settings.tax.method, TaxMethod::After);
        assert_eq!(state.settings.discount.distribution, Distribution::Equal);
        assert_eq!(state.settings.shipping.distribution, Distribution::Proportional);
        assert!(!state.settings.exclude_no_order);
    }

    #[test]
    fn test_bill_date_arg() {
        assert_eq!(bill_date_arg(None, today()).unwrap(), today());
        assert_eq!(
            bill_date_arg(Some("02-01-2024"), today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert!(bill_date_arg(Some("2024/01/02"), today()).is_err());
    }

    #[test]
    fn test_bill_from_missing_file() {
        let missing = std::env::temp_dir().join("splitbill-no-such-export.json");
        assert!(bill_from_export(&missing, today()).is_err());
    }
}
