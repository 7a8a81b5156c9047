//! # Error Types
//!
//! Domain-specific error types for splitbill-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  splitbill-core errors (this file)                                     │
//! │  ├── CoreError        - Domain errors (unknown ids, strict mode)       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  splitbill-store errors (separate crate)                               │
//! │  └── StoreError       - Database / config / document failures          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → CLI exit message     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What is NOT an error
//! Dangling person or item references and a zero subtotal are absorbed by
//! the engine as zero contributions. Only the cases below surface.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Person id does not exist in the bill.
    #[error("Person not found: {0}")]
    PersonNotFound(String),

    /// Restaurant id does not exist in the bill.
    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(String),

    /// Menu item id does not exist in the bill.
    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    /// Order id does not exist in the bill.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// An order must reference at least one menu item.
    #[error("Order for person {person_id} has no items")]
    EmptyOrder { person_id: String },

    /// History entry id does not exist in the archive.
    #[error("History entry not found: {0}")]
    HistoryEntryNotFound(String),

    /// Tax rate outside `[0, 100]` under strict validation.
    ///
    /// ## When This Occurs
    /// ```text
    /// BillConfig { tax.rate: 150, mode: Strict }
    ///      │
    ///      ▼
    /// compute_breakdown ──► TaxRateOutOfRange { rate: 150 }
    ///
    /// (Permissive mode clamps the same rate to 100 instead.)
    /// ```
    #[error("Tax rate {rate}% is outside 0-100%")]
    TaxRateOutOfRange { rate: Decimal },

    /// Negative monetary magnitude under strict validation.
    #[error("{field} must not be negative, got {amount}")]
    NegativeAmount { field: String, amount: Money },

    /// Import document rejected as a whole.
    #[error("Invalid import file: {0}")]
    InvalidImport(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the editing boundary (adding people, items, history names)
/// before anything reaches the bill state.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Invalid format (e.g. a date that does not parse).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
