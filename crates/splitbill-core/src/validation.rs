//! # Validation Module
//!
//! Input validation for the editing boundary of Split Bill.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end                                                    │
//! │  └── Basic format checks, immediate feedback                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: BillState / OrderHistory operations                          │
//! │  └── THIS MODULE: names, prices, dates                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Splitting engine                                             │
//! │  └── ValidationMode: clamp (permissive) or reject (strict)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Documents loaded from disk or imported are NOT re-validated here; the
//! engine tolerates whatever they contain.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Percentage;
use crate::MAX_HISTORY_NAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of person, restaurant and menu item names.
pub const MAX_NAME_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Trims a name and checks it is non-empty and at most `max` characters.
///
/// ## Returns
/// The trimmed name.
///
/// ## Example
/// ```rust
/// use splitbill_core::validation::validate_name;
///
/// assert_eq!(validate_name("name", "  Alice ", 100).unwrap(), "Alice");
/// assert!(validate_name("name", "   ", 100).is_err());
/// ```
pub fn validate_name(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates a participant name.
pub fn validate_person_name(name: &str) -> ValidationResult<String> {
    validate_name("person name", name, MAX_NAME_LEN)
}

/// Validates a restaurant name.
pub fn validate_restaurant_name(name: &str) -> ValidationResult<String> {
    validate_name("restaurant name", name, MAX_NAME_LEN)
}

/// Validates a menu item name.
pub fn validate_menu_item_name(name: &str) -> ValidationResult<String> {
    validate_name("menu item name", name, MAX_NAME_LEN)
}

/// Validates the name given to an archived bill.
///
/// ## Rules
/// - Trimmed, non-empty
/// - At most 120 characters
pub fn validate_history_name(name: &str) -> ValidationResult<String> {
    validate_name("history name", name, MAX_HISTORY_NAME_LEN)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Rejects NaN and infinities coming from a float-speaking caller.
#[inline]
pub fn require_finite(value: f64, field: &str) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a menu item price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use splitbill_core::money::Money;
/// use splitbill_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_major(5000)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_major(-1)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    validate_non_negative("price", price)
}

/// Validates that an adjustment amount is zero or greater.
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a tax percentage.
///
/// ## Rules
/// - Must be between 0 and 100 inclusive
pub fn validate_tax_rate(rate: Percentage) -> ValidationResult<()> {
    if !rate.is_within_bounds() {
        return Err(ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a bill date written as `YYYY-MM-DD` or `DD-MM-YYYY`.
///
/// ## Example
/// ```rust
/// use splitbill_core::validation::parse_bill_date;
///
/// let a = parse_bill_date("2024-03-09").unwrap();
/// let b = parse_bill_date("09-03-2024").unwrap();
/// assert_eq!(a, b);
/// ```
pub fn parse_bill_date(value: &str) -> ValidationResult<NaiveDate> {
    let value = value.trim();

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d-%m-%Y"))
        .map_err(|_| ValidationError::InvalidFormat {
            field: "bill date".to_string(),
            reason: format!("'{value}' is not YYYY-MM-DD or DD-MM-YYYY"),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_names() {
        assert_eq!(validate_person_name(" Budi ").unwrap(), "Budi");
        assert!(validate_person_name("").is_err());
        assert!(validate_restaurant_name(&"A".repeat(101)).is_err());
        assert!(validate_menu_item_name("Sate Ayam").is_ok());
    }

    #[test]
    fn test_validate_history_name_length() {
        assert!(validate_history_name(&"x".repeat(120)).is_ok());
        assert!(matches!(
            validate_history_name(&"x".repeat(121)),
            Err(ValidationError::TooLong { max: 120, .. })
        ));
        assert!(matches!(
            validate_history_name("  \t "),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_require_finite() {
        assert!(require_finite(1.5, "price").is_ok());
        assert!(require_finite(f64::NAN, "price").is_err());
        assert!(require_finite(f64::INFINITY, "price").is_err());
    }

    #[test]
    fn test_validate_tax_rate() {
        assert!(validate_tax_rate(Percentage::from_whole(0)).is_ok());
        assert!(validate_tax_rate(Percentage::from_whole(11)).is_ok());
        assert!(validate_tax_rate(Percentage::from_whole(100)).is_ok());
        assert!(validate_tax_rate(Percentage::from_whole(101)).is_err());
        assert!(validate_tax_rate(Percentage::from_whole(-1)).is_err());
    }

    #[test]
    fn test_parse_bill_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(parse_bill_date("2024-12-31").unwrap(), expected);
        assert_eq!(parse_bill_date("31-12-2024").unwrap(), expected);
        assert!(parse_bill_date("31/12/2024").is_err());
    }
}
