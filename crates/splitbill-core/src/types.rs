//! # Domain Types
//!
//! Core domain types used throughout Split Bill.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Person      │   │    MenuItem     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  name, price    │   │  person_id      │       │
//! │  └─────────────────┘   │  restaurant_id? │   │  items[] (dup = │       │
//! │                        └─────────────────┘   │   quantity)     │       │
//! │  ┌─────────────────┐                         └─────────────────┘       │
//! │  │   Restaurant    │   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  id, name       │   │   Adjustment    │   │   TaxSetting    │       │
//! │  └─────────────────┘   │  amount         │   │  rate (%)       │       │
//! │                        │  distribution   │   │  method         │       │
//! │                        └─────────────────┘   │  distribution   │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! New entities get a UUID v4 string id. Ids read from documents are
//! treated as opaque strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Percentage
// =============================================================================

/// A percentage such as a tax rate (`10` = 10%).
///
/// Stored exactly; only the engine decides whether an out-of-range value is
/// clamped or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percentage(#[ts(type = "number")] Decimal);

impl Percentage {
    /// Wraps an exact percentage value.
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Percentage(value)
    }

    /// Creates a percentage from a whole number (`from_whole(10)` = 10%).
    #[inline]
    pub fn from_whole(value: i64) -> Self {
        Percentage(Decimal::from(value))
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percentage(Decimal::ZERO)
    }

    /// Returns the raw percentage value.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Checks if the percentage is strictly greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks that the value lies in `[0, 100]`.
    pub fn is_within_bounds(&self) -> bool {
        self.0 >= Decimal::ZERO && self.0 <= Decimal::ONE_HUNDRED
    }

    /// Clamps into `[0, 100]`.
    pub fn clamped(&self) -> Self {
        Percentage(self.0.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
    }
}

// =============================================================================
// Distribution & Tax Method
// =============================================================================

/// How an adjustment is spread across the included people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Distribution {
    /// Same amount for everybody.
    #[default]
    Equal,
    /// In proportion to each person's raw subtotal.
    Proportional,
}

impl Distribution {
    /// Serde default for the discount policy.
    pub fn proportional() -> Self {
        Distribution::Proportional
    }
}

/// Whether tax is levied before or after shipping and other costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TaxMethod {
    /// Tax base = discounted subtotal.
    #[default]
    Before,
    /// Tax base = discounted subtotal + shipping + other.
    After,
}

/// How strictly the engine treats out-of-range input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ValidationMode {
    /// Clamp the tax rate into `[0, 100]`; accept any sign on amounts.
    #[default]
    Permissive,
    /// Reject out-of-range tax rates and negative amounts.
    Strict,
}

// =============================================================================
// Adjustments
// =============================================================================

/// An absolute bill-level amount (shipping, discount, other) and how it is
/// distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Adjustment {
    pub amount: Money,
    pub distribution: Distribution,
}

impl Adjustment {
    /// Split evenly across included people.
    pub fn equal(amount: Money) -> Self {
        Self {
            amount,
            distribution: Distribution::Equal,
        }
    }

    /// Split by raw subtotal.
    pub fn proportional(amount: Money) -> Self {
        Self {
            amount,
            distribution: Distribution::Proportional,
        }
    }
}

/// The tax percentage with its method and distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxSetting {
    pub rate: Percentage,
    pub method: TaxMethod,
    pub distribution: Distribution,
}

impl TaxSetting {
    pub fn new(rate: Percentage, method: TaxMethod, distribution: Distribution) -> Self {
        Self {
            rate,
            method,
            distribution,
        }
    }
}

// =============================================================================
// Entities
// =============================================================================

/// A participant in the bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Person {
    pub id: String,
    pub name: String,
}

impl Person {
    /// Creates a person with a fresh UUID.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(new_id(), name)
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A place menu items belong to; selecting one scopes the bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
}

impl Restaurant {
    /// Creates a restaurant with a fresh UUID.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(new_id(), name)
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A priced menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub price: Money,
    /// Owning restaurant, if any. Items without one never match a scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
}

impl MenuItem {
    /// Creates a menu item with a fresh UUID.
    pub fn new(name: impl Into<String>, price: Money, restaurant_id: Option<String>) -> Self {
        Self::with_id(new_id(), name, price, restaurant_id)
    }

    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        restaurant_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            restaurant_id,
        }
    }

    /// True when this item belongs to the given restaurant.
    pub fn belongs_to(&self, restaurant_id: &str) -> bool {
        self.restaurant_id.as_deref() == Some(restaurant_id)
    }
}

/// What one person ordered. A repeated item id means quantity > 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub person_id: String,
    pub items: Vec<String>,
}

impl Order {
    /// Creates an order with a fresh UUID.
    pub fn new(person_id: impl Into<String>, items: Vec<String>) -> Self {
        Self::with_id(new_id(), person_id, items)
    }

    pub fn with_id(id: impl Into<String>, person_id: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            id: id.into(),
            person_id: person_id.into(),
            items,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_bounds() {
        assert!(Percentage::from_whole(10).is_within_bounds());
        assert!(Percentage::from_whole(0).is_within_bounds());
        assert!(Percentage::from_whole(100).is_within_bounds());
        assert!(!Percentage::from_whole(-1).is_within_bounds());
        assert!(!Percentage::from_whole(150).is_within_bounds());

        assert_eq!(Percentage::from_whole(150).clamped(), Percentage::from_whole(100));
        assert_eq!(Percentage::from_whole(-5).clamped(), Percentage::zero());
    }

    #[test]
    fn test_new_entities_get_distinct_ids() {
        let a = Person::new("Alice");
        let b = Person::new("Alice");
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 36);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&Distribution::Proportional).unwrap(),
            "\"proportional\""
        );
        assert_eq!(serde_json::to_string(&TaxMethod::After).unwrap(), "\"after\"");
        let method: TaxMethod = serde_json::from_str("\"before\"").unwrap();
        assert_eq!(method, TaxMethod::Before);
    }

    #[test]
    fn test_menu_item_wire_format() {
        let json = r#"{"id":"m1","name":"Es Teh","price":5000,"restaurantId":"r1"}"#;
        let item: MenuItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.price, Money::from_major(5000));
        assert!(item.belongs_to("r1"));
        assert!(!item.belongs_to("r2"));

        let unscoped: MenuItem =
            serde_json::from_str(r#"{"id":"m2","name":"Air","price":0}"#).unwrap();
        assert_eq!(unscoped.restaurant_id, None);
    }
}
