//! # History Archive
//!
//! Named, dated snapshots of past bills with their computed results.
//!
//! ## Lifecycle
//! ```text
//! BillState + Breakdown ──archive(name, dates)──► HistoryEntry (front of list)
//!                                                      │
//!                 rename / remove (explicit user action only)
//!                                                      │
//! BillState ◄──────────────── restore ─────────────────┘
//! ```
//!
//! Entries are never touched by the engine. `restore` is a verbatim data
//! hand-off; feeding the restored state back into the engine reproduces the
//! archived breakdown.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use crate::engine::Breakdown;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::state::{BillSettings, BillState};
use crate::types::{
    Adjustment, Distribution, MenuItem, Order, Percentage, Person, Restaurant, TaxMethod,
    TaxSetting,
};
use crate::validation::validate_history_name;

fn default_true() -> bool {
    true
}

// =============================================================================
// History Entry
// =============================================================================

/// An archived bill.
///
/// The last five fields are absent from entries written before they
/// existed and fall back to the defaults of a fresh bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HistoryEntry {
    pub id: String,
    pub name: String,
    #[ts(as = "String")]
    pub saved_at: NaiveDate,
    #[ts(as = "String")]
    pub bill_date: NaiveDate,
    pub people: Vec<Person>,
    pub menu_items: Vec<MenuItem>,
    pub orders: Vec<Order>,
    #[serde(default)]
    pub restaurants: Vec<Restaurant>,
    #[serde(default)]
    pub selected_restaurant: Option<String>,
    #[serde(default)]
    pub restaurant_name: String,
    /// Bill subtotal.
    pub subtotal: Money,
    /// Discount amount as entered.
    pub discount: Money,
    /// Computed tax amount.
    pub tax: Money,
    /// Tax percentage as entered.
    pub tax_rate: Percentage,
    #[serde(default)]
    pub tax_method: TaxMethod,
    pub shipping_cost: Money,
    pub other_cost: Money,
    pub total_bill: Money,
    /// Person id → total.
    pub final_amounts: BTreeMap<String, Money>,
    #[serde(default = "Distribution::proportional")]
    pub discount_distribution: Distribution,
    #[serde(default)]
    pub tax_distribution: Distribution,
    #[serde(default)]
    pub shipping_distribution: Distribution,
    #[serde(default)]
    pub other_distribution: Distribution,
    #[serde(default = "default_true")]
    pub exclude_no_order: bool,
}

impl HistoryEntry {
    /// The archived bill as live, editable state.
    pub fn restore(&self) -> BillState {
        BillState {
            people: self.people.clone(),
            restaurants: self.restaurants.clone(),
            menu_items: self.menu_items.clone(),
            orders: self.orders.clone(),
            settings: BillSettings {
                selected_restaurant: self
                    .selected_restaurant
                    .clone()
                    .filter(|id| !id.is_empty()),
                discount: Adjustment {
                    amount: self.discount,
                    distribution: self.discount_distribution,
                },
                shipping: Adjustment {
                    amount: self.shipping_cost,
                    distribution: self.shipping_distribution,
                },
                other: Adjustment {
                    amount: self.other_cost,
                    distribution: self.other_distribution,
                },
                tax: TaxSetting::new(self.tax_rate, self.tax_method, self.tax_distribution),
                exclude_no_order: self.exclude_no_order,
            },
            bill_date: self.bill_date,
        }
    }
}

/// Suggested entry name: `"<restaurant or 'Order'> - DD-MM-YYYY"`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use splitbill_core::history::default_entry_name;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert_eq!(default_entry_name(Some("Warung"), date), "Warung - 09-03-2024");
/// assert_eq!(default_entry_name(None, date), "Order - 09-03-2024");
/// ```
pub fn default_entry_name(restaurant_name: Option<&str>, bill_date: NaiveDate) -> String {
    let label = restaurant_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("Order");
    format!("{} - {}", label, bill_date.format("%d-%m-%Y"))
}

// =============================================================================
// Order History
// =============================================================================

/// Archived bills, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderHistory {
    entries: Vec<HistoryEntry>,
}

impl OrderHistory {
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> CoreResult<&HistoryEntry> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| CoreError::HistoryEntryNotFound(id.to_string()))
    }

    /// Archives a bill and its breakdown at the front of the list.
    ///
    /// Amounts are stored as given. Pass a rounded view
    /// ([`Breakdown::rounded`]) to keep stored amounts exact as JSON numbers.
    ///
    /// ## Errors
    /// The name must be non-empty after trimming and at most 120 characters.
    pub fn archive(
        &mut self,
        state: &BillState,
        breakdown: &Breakdown,
        name: &str,
        bill_date: NaiveDate,
        saved_at: NaiveDate,
    ) -> CoreResult<&HistoryEntry> {
        let name = validate_history_name(name)?;
        let settings = &state.settings;

        let entry = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            name,
            saved_at,
            bill_date,
            people: state.people.clone(),
            menu_items: state.menu_items.clone(),
            orders: state.orders.clone(),
            restaurants: state.restaurants.clone(),
            selected_restaurant: settings.selected_restaurant.clone(),
            restaurant_name: state.restaurant_name().unwrap_or_default().to_string(),
            subtotal: breakdown.bill_subtotal,
            discount: settings.discount.amount,
            tax: breakdown.tax_amount,
            tax_rate: settings.tax.rate,
            tax_method: settings.tax.method,
            shipping_cost: settings.shipping.amount,
            other_cost: settings.other.amount,
            total_bill: breakdown.total_bill,
            final_amounts: breakdown.final_amounts(),
            discount_distribution: settings.discount.distribution,
            tax_distribution: settings.tax.distribution,
            shipping_distribution: settings.shipping.distribution,
            other_distribution: settings.other.distribution,
            exclude_no_order: settings.exclude_no_order,
        };

        info!(entry_id = %entry.id, name = %entry.name, "Archived bill");
        self.entries.insert(0, entry);
        Ok(&self.entries[0])
    }

    /// Looks an entry up and returns it as live state.
    pub fn restore(&self, id: &str) -> CoreResult<BillState> {
        self.get(id).map(HistoryEntry::restore)
    }

    /// Deletes an entry.
    pub fn remove(&mut self, id: &str) -> CoreResult<HistoryEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| CoreError::HistoryEntryNotFound(id.to_string()))?;
        Ok(self.entries.remove(index))
    }

    /// Renames an entry and moves its bill date.
    pub fn rename(&mut self, id: &str, name: &str, bill_date: NaiveDate) -> CoreResult<&HistoryEntry> {
        let name = validate_history_name(name)?;
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| CoreError::HistoryEntryNotFound(id.to_string()))?;

        entry.name = name;
        entry.bill_date = bill_date;
        Ok(entry)
    }

    pub fn into_entries(self) -> Vec<HistoryEntry> {
        self.entries
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
