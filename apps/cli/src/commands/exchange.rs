//! `splitbill import` and `splitbill export`.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use splitbill_core::exchange::{export, parse_import};
use splitbill_core::BillState;
use splitbill_store::{AppConfig, StoreResult};
use tracing::info;

use crate::session::Session;

/// Replaces the stored people, menu items and amounts with an export file's.
///
/// The file is fully checked before anything is replaced.
pub async fn import(file: &Path, config: &AppConfig, today: NaiveDate) -> StoreResult<()> {
    let json = std::fs::read_to_string(file)?;
    let document = parse_import(&json)?;

    let mut session = Session::open(config, today).await?;
    session.state.apply_import(document);
    session.commit().await?;

    println!(
        "Imported {} people and {} menu items",
        session.state.people.len(),
        session.state.menu_items.len()
    );
    session.close().await
}

/// Writes the stored bill as an export file, or to stdout.
pub async fn export_current(out: Option<PathBuf>, config: &AppConfig, today: NaiveDate) -> StoreResult<()> {
    let session = Session::open(config, today).await?;
    write_export(&session.state, out.as_deref())?;
    session.close().await
}

/// Serializes `state` as an export document.
pub fn write_export(state: &BillState, out: Option<&Path>) -> StoreResult<()> {
    let json = serde_json::to_string_pretty(&export(state, Utc::now()))?;

    match out {
        Some(path) => {
            std::fs::write(path, json)?;
            info!(path = %path.display(), "Export written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
