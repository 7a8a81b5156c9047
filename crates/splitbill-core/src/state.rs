//! # Bill State
//!
//! The live, editable bill the caller owns, and the document shape it is
//! persisted as.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  BillState (mutable, owned by the caller)                               │
//! │     │  add_person / add_menu_item / add_order / select_restaurant ...   │
//! │     │                                                                   │
//! │     ├── to_config(mode) ──► BillConfig (immutable) ──► engine           │
//! │     │                                                                   │
//! │     └── to_document(history) ──► StoredDocument ──► splitbill-store     │
//! │                                  (orders are NOT persisted)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Removals cascade the way a user expects: dropping a person drops their
//! orders, dropping a menu item strips it from every order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::engine::BillConfig;
use crate::error::{CoreError, CoreResult};
use crate::history::{HistoryEntry, OrderHistory};
use crate::money::Money;
use crate::types::{
    Adjustment, MenuItem, Order, Person, Restaurant, TaxSetting, ValidationMode,
};
use crate::validation::{
    validate_menu_item_name, validate_person_name, validate_price, validate_restaurant_name,
};

// =============================================================================
// Settings
// =============================================================================

/// Bill-wide adjustments and the selected restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct BillSettings {
    pub selected_restaurant: Option<String>,
    pub discount: Adjustment,
    pub shipping: Adjustment,
    pub other: Adjustment,
    pub tax: TaxSetting,
    pub exclude_no_order: bool,
}

impl Default for BillSettings {
    fn default() -> Self {
        Self {
            selected_restaurant: None,
            discount: Adjustment::proportional(Money::zero()),
            shipping: Adjustment::equal(Money::zero()),
            other: Adjustment::equal(Money::zero()),
            tax: TaxSetting::default(),
            exclude_no_order: true,
        }
    }
}

// =============================================================================
// Stored Document
// =============================================================================

/// What the State Store persists per user.
///
/// Orders are scratch state and deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct StoredDocument {
    pub people: Vec<Person>,
    pub restaurants: Vec<Restaurant>,
    pub menu_items: Vec<MenuItem>,
    pub order_history: Vec<HistoryEntry>,
    pub settings: BillSettings,
}

// =============================================================================
// Bill State
// =============================================================================

/// The editable bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillState {
    pub people: Vec<Person>,
    pub restaurants: Vec<Restaurant>,
    pub menu_items: Vec<MenuItem>,
    pub orders: Vec<Order>,
    pub settings: BillSettings,
    pub bill_date: NaiveDate,
}

impl BillState {
    /// Creates an empty bill dated `bill_date`.
    pub fn new(bill_date: NaiveDate) -> Self {
        Self {
            people: Vec::new(),
            restaurants: Vec::new(),
            menu_items: Vec::new(),
            orders: Vec::new(),
            settings: BillSettings::default(),
            bill_date,
        }
    }

    // -------------------------------------------------------------------------
    // People
    // -------------------------------------------------------------------------

    /// Adds a participant.
    pub fn add_person(&mut self, name: &str) -> CoreResult<&Person> {
        let name = validate_person_name(name)?;
        let index = self.people.len();
        self.people.push(Person::new(name));
        Ok(&self.people[index])
    }

    /// Removes a participant together with their orders.
    pub fn remove_person(&mut self, person_id: &str) -> CoreResult<Person> {
        let index = self
            .people
            .iter()
            .position(|p| p.id == person_id)
            .ok_or_else(|| CoreError::PersonNotFound(person_id.to_string()))?;

        self.orders.retain(|order| order.person_id != person_id);
        Ok(self.people.remove(index))
    }

    // -------------------------------------------------------------------------
    // Restaurants
    // -------------------------------------------------------------------------

    /// Adds a restaurant.
    pub fn add_restaurant(&mut self, name: &str) -> CoreResult<&Restaurant> {
        let name = validate_restaurant_name(name)?;
        let index = self.restaurants.len();
        self.restaurants.push(Restaurant::new(name));
        Ok(&self.restaurants[index])
    }

    /// Removes a restaurant; clears the selection if it pointed there.
    ///
    /// Menu items keep their (now dangling) restaurant id.
    pub fn remove_restaurant(&mut self, restaurant_id: &str) -> CoreResult<Restaurant> {
        let index = self
            .restaurants
            .iter()
            .position(|r| r.id == restaurant_id)
            .ok_or_else(|| CoreError::RestaurantNotFound(restaurant_id.to_string()))?;

        if self.settings.selected_restaurant.as_deref() == Some(restaurant_id) {
            self.settings.selected_restaurant = None;
        }
        Ok(self.restaurants.remove(index))
    }

    /// Selects the restaurant scope, or clears it with `None`.
    ///
    /// Selecting a restaurant prunes every order down to that restaurant's
    /// items and drops orders left empty.
    pub fn select_restaurant(&mut self, restaurant_id: Option<&str>) -> CoreResult<()> {
        let Some(restaurant_id) = restaurant_id.filter(|id| !id.is_empty()) else {
            self.settings.selected_restaurant = None;
            return Ok(());
        };

        if !self.restaurants.iter().any(|r| r.id == restaurant_id) {
            return Err(CoreError::RestaurantNotFound(restaurant_id.to_string()));
        }

        self.settings.selected_restaurant = Some(restaurant_id.to_string());
        self.prune_orders_to(restaurant_id);
        Ok(())
    }

    fn prune_orders_to(&mut self, restaurant_id: &str) {
        let menu_items = &self.menu_items;
        let in_scope = |item_id: &String| {
            menu_items
                .iter()
                .find(|item| &item.id == item_id)
                .is_some_and(|item| item.belongs_to(restaurant_id))
        };

        for order in &mut self.orders {
            order.items.retain(|item_id| in_scope(item_id));
        }
        self.orders.retain(|order| !order.items.is_empty());
    }

    /// Name of the selected restaurant, if any.
    pub fn restaurant_name(&self) -> Option<&str> {
        let selected = self.settings.selected_restaurant.as_deref()?;
        self.restaurants
            .iter()
            .find(|r| r.id == selected)
            .map(|r| r.name.as_str())
    }

    // -------------------------------------------------------------------------
    // Menu
    // -------------------------------------------------------------------------

    /// Adds a priced menu item, optionally owned by a restaurant.
    pub fn add_menu_item(
        &mut self,
        name: &str,
        price: Money,
        restaurant_id: Option<&str>,
    ) -> CoreResult<&MenuItem> {
        let name = validate_menu_item_name(name)?;
        validate_price(price)?;

        let restaurant_id = restaurant_id.filter(|id| !id.is_empty());
        if let Some(id) = restaurant_id {
            if !self.restaurants.iter().any(|r| r.id == id) {
                return Err(CoreError::RestaurantNotFound(id.to_string()));
            }
        }

        let index = self.menu_items.len();
        self.menu_items
            .push(MenuItem::new(name, price, restaurant_id.map(str::to_string)));
        Ok(&self.menu_items[index])
    }

    /// Removes a menu item, strips it from every order and drops orders
    /// left empty.
    pub fn remove_menu_item(&mut self, item_id: &str) -> CoreResult<MenuItem> {
        let index = self
            .menu_items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| CoreError::MenuItemNotFound(item_id.to_string()))?;

        for order in &mut self.orders {
            order.items.retain(|id| id != item_id);
        }
        self.orders.retain(|order| !order.items.is_empty());
        Ok(self.menu_items.remove(index))
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// Records an order. Repeat an item id to order it more than once.
    pub fn add_order(&mut self, person_id: &str, items: Vec<String>) -> CoreResult<&Order> {
        if !self.people.iter().any(|p| p.id == person_id) {
            return Err(CoreError::PersonNotFound(person_id.to_string()));
        }
        if items.is_empty() {
            return Err(CoreError::EmptyOrder {
                person_id: person_id.to_string(),
            });
        }
        if let Some(unknown) = items
            .iter()
            .find(|id| !self.menu_items.iter().any(|item| &item.id == *id))
        {
            return Err(CoreError::MenuItemNotFound(unknown.clone()));
        }

        let index = self.orders.len();
        self.orders.push(Order::new(person_id, items));
        Ok(&self.orders[index])
    }

    /// Removes an order.
    pub fn remove_order(&mut self, order_id: &str) -> CoreResult<Order> {
        let index = self
            .orders
            .iter()
            .position(|order| order.id == order_id)
            .ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()))?;
        Ok(self.orders.remove(index))
    }

    // -------------------------------------------------------------------------
    // Adjustments
    // -------------------------------------------------------------------------

    pub fn set_shipping(&mut self, shipping: Adjustment) {
        self.settings.shipping = shipping;
    }

    pub fn set_other(&mut self, other: Adjustment) {
        self.settings.other = other;
    }

    pub fn set_discount(&mut self, discount: Adjustment) {
        self.settings.discount = discount;
    }

    pub fn set_tax(&mut self, tax: TaxSetting) {
        self.settings.tax = tax;
    }

    pub fn set_exclude_no_order(&mut self, exclude: bool) {
        self.settings.exclude_no_order = exclude;
    }

    pub fn set_bill_date(&mut self, bill_date: NaiveDate) {
        self.bill_date = bill_date;
    }

    /// Clears people, menu items, orders and adjustment amounts.
    ///
    /// Restaurants, the selection and the chosen distributions survive.
    pub fn clear(&mut self) {
        self.people.clear();
        self.menu_items.clear();
        self.orders.clear();
        self.settings.discount.amount = Money::zero();
        self.settings.shipping.amount = Money::zero();
        self.settings.other.amount = Money::zero();
        self.settings.tax.rate = Default::default();
    }

    // -------------------------------------------------------------------------
    // Conversions
    // -------------------------------------------------------------------------

    /// Snapshot for the splitting engine.
    pub fn to_config(&self, mode: ValidationMode) -> BillConfig {
        BillConfig {
            people: self.people.clone(),
            menu_items: self.menu_items.clone(),
            orders: self.orders.clone(),
            restaurant_scope: self.settings.selected_restaurant.clone(),
            exclude_no_order: self.settings.exclude_no_order,
            discount: self.settings.discount,
            shipping: self.settings.shipping,
            other: self.settings.other,
            tax: self.settings.tax,
            mode,
        }
    }

    /// Document to persist; orders are dropped.
    pub fn to_document(&self, history: &OrderHistory) -> StoredDocument {
        StoredDocument {
            people: self.people.clone(),
            restaurants: self.restaurants.clone(),
            menu_items: self.menu_items.clone(),
            order_history: history.entries().to_vec(),
            settings: self.settings.clone(),
        }
    }

    /// Rebuilds state from a persisted document, starting with no orders.
    pub fn from_document(document: StoredDocument, bill_date: NaiveDate) -> (Self, OrderHistory) {
        let mut settings = document.settings;
        settings.selected_restaurant = settings.selected_restaurant.filter(|id| !id.is_empty());

        let state = Self {
            people: document.people,
            restaurants: document.restaurants,
            menu_items: document.menu_items,
            orders: Vec::new(),
            settings,
            bill_date,
        };
        (state, OrderHistory::from_entries(document.order_history))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
