//! # Import / Export
//!
//! The portable JSON file users pass around:
//!
//! ```text
//! {
//!   "people": [...], "menuItems": [...], "orders": [...],
//!   "shippingCost": 10000, "tax": 10, "discount": 0, "otherCost": 0,
//!   "exportDate": "2024-06-01T12:00:00.000Z"
//! }
//! ```
//!
//! Import is all-or-nothing: the document is fully parsed and checked
//! before [`BillState::apply_import`] touches anything.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::state::BillState;
use crate::types::{MenuItem, Order, Percentage, Person};

/// Sections every import must carry as arrays.
const REQUIRED_LISTS: [&str; 3] = ["people", "menuItems", "orders"];

/// Export file contents.
///
/// Amount fields are optional on import; numbers and numeric strings are
/// both accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExportDocument {
    pub people: Vec<Person>,
    pub menu_items: Vec<MenuItem>,
    pub orders: Vec<Order>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_cost: Option<Money>,
    /// Tax percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<Percentage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_cost: Option<Money>,
    /// RFC 3339 timestamp of the export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,
}

/// Captures the bill's lists and amounts as an export document.
pub fn export(state: &BillState, now: DateTime<Utc>) -> ExportDocument {
    let settings = &state.settings;
    ExportDocument {
        people: state.people.clone(),
        menu_items: state.menu_items.clone(),
        orders: state.orders.clone(),
        shipping_cost: Some(settings.shipping.amount),
        tax: Some(settings.tax.rate),
        discount: Some(settings.discount.amount),
        other_cost: Some(settings.other.amount),
        export_date: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
    }
}

/// Parses and checks an export file.
///
/// ## Errors
/// [`CoreError::InvalidImport`] when the text is not JSON, when `people`,
/// `menuItems` or `orders` is missing or not an array, or when any entry
/// does not deserialize.
pub fn parse_import(json: &str) -> CoreResult<ExportDocument> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| CoreError::InvalidImport(e.to_string()))?;

    for field in REQUIRED_LISTS {
        match value.get(field) {
            Some(Value::Array(_)) => {}
            Some(_) => {
                return Err(CoreError::InvalidImport(format!("{field} must be a list")));
            }
            None => return Err(CoreError::InvalidImport(format!("{field} is missing"))),
        }
    }

    serde_json::from_value(value).map_err(|e| CoreError::InvalidImport(e.to_string()))
}

impl BillState {
    /// Replaces people, menu items and orders, and every amount the
    /// document carries. Absent amounts keep their current value.
    pub fn apply_import(&mut self, document: ExportDocument) {
        info!(
            people = document.people.len(),
            menu_items = document.menu_items.len(),
            orders = document.orders.len(),
            "Importing bill"
        );

        self.people = document.people;
        self.menu_items = document.menu_items;
        self.orders = document.orders;

        if let Some(shipping) = document.shipping_cost {
            self.settings.shipping.amount = shipping;
        }
        if let Some(rate) = document.tax {
            self.settings.tax.rate = rate;
        }
        if let Some(discount) = document.discount {
            self.settings.discount.amount = discount;
        }
        if let Some(other) = document.other_cost {
            self.settings.other.amount = other;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Adjustment;
    use chrono::{NaiveDate, TimeZone};

    fn empty_state() -> BillState {
        BillState::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    const SAMPLE: &str = r#"{
        "people": [{"id": "a", "name": "Ayu"}],
        "menuItems": [{"id": "m1", "name": "Bakso", "price": 18000}],
        "orders": [{"id": "o1", "personId": "a", "items": ["m1", "m1"]}],
        "shippingCost": "8000",
        "tax": 11,
        "exportDate": "2024-06-01T10:00:00.000Z"
    }"#;

    #[test]
    fn test_parse_import_accepts_numeric_strings() {
        let doc = parse_import(SAMPLE).unwrap();
        assert_eq!(doc.people.len(), 1);
        assert_eq!(doc.orders[0].items.len(), 2);
        assert_eq!(doc.shipping_cost, Some(Money::from_major(8_000)));
        assert_eq!(doc.tax, Some(Percentage::from_whole(11)));
        assert_eq!(doc.discount, None);
    }

    #[test]
    fn test_parse_import_rejects_missing_or_wrong_lists() {
        assert!(matches!(
            parse_import(r#"{"people": [], "menuItems": []}"#),
            Err(CoreError::InvalidImport(msg)) if msg.contains("orders")
        ));
        assert!(matches!(
            parse_import(r#"{"people": {}, "menuItems": [], "orders": []}"#),
            Err(CoreError::InvalidImport(msg)) if msg.contains("people")
        ));
        assert!(parse_import("not json").is_err());
        assert!(parse_import(r#"[1, 2]"#).is_err());
    }

    #[test]
    fn test_parse_import_rejects_malformed_entries() {
        let json = r#"{"people": [{"id": 1}], "menuItems": [], "orders": []}"#;
        assert!(matches!(parse_import(json), Err(CoreError::InvalidImport(_))));
    }

    #[test]
    fn test_apply_import_replaces_lists_and_present_amounts() {
        let mut state = empty_state();
        state.add_person("Old").unwrap();
        state.set_other(Adjustment::equal(Money::from_major(3_000)));

        state.apply_import(parse_import(SAMPLE).unwrap());

        assert_eq!(state.people[0].name, "Ayu");
        assert_eq!(state.orders.len(), 1);
        assert_eq!(state.settings.shipping.amount, Money::from_major(8_000));
        assert_eq!(state.settings.tax.rate, Percentage::from_whole(11));
        assert_eq!(state.settings.other.amount, Money::from_major(3_000));
    }

    #[test]
    fn test_rejected_import_leaves_state_untouched() {
        let mut state = empty_state();
        state.add_person("Keep").unwrap();
        let before = state.clone();

        if let Ok(doc) = parse_import(r#"{"people": [], "orders": []}"#) {
            state.apply_import(doc);
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_export_then_import() {
        let mut state = empty_state();
        let id = state.add_person("Ayu").unwrap().id.clone();
        let item = state
            .add_menu_item("Bakso", Money::from_major(18_000), None)
            .unwrap()
            .id
            .clone();
        state.add_order(&id, vec![item]).unwrap();
        state.set_discount(Adjustment::proportional(Money::from_major(2_000)));

        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let json = serde_json::to_string_pretty(&export(&state, now)).unwrap();
        assert!(json.contains("\"exportDate\": \"2024-06-01T12:00:00.000Z\""));

        let mut fresh = empty_state();
        fresh.apply_import(parse_import(&json).unwrap());
        assert_eq!(fresh.people, state.people);
        assert_eq!(fresh.menu_items, state.menu_items);
        assert_eq!(fresh.orders, state.orders);
        assert_eq!(fresh.settings.discount.amount, Money::from_major(2_000));
    }
}
