//! # splitbill-core: Pure Business Logic for Split Bill
//!
//! Everything needed to turn a list of people, a menu and orders into a
//! per-person bill lives here, as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Split Bill Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Front end (UI or `splitbill` CLI)               │   │
//! │  │      People ──► Menu ──► Orders ──► Summary ──► History         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ splitbill-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   state   │  │  engine   │  │  history  │  │ exchange  │  │   │
//! │  │   │ BillState │  │ Breakdown │  │  archive  │  │ import/   │  │   │
//! │  │   │  editing  │  │  shares   │  │  restore  │  │  export   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              splitbill-store (Persistence Layer)                │   │
//! │  │       SQLite documents, debounced writes, configuration         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Person, MenuItem, Order, adjustments)
//! - [`money`] - Exact decimal money with a single rounding rule
//! - [`engine`] - The splitting engine and its rounded views
//! - [`state`] - Editable bill state and the persisted document shape
//! - [`exchange`] - Export/import documents
//! - [`history`] - Archived bills
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use splitbill_core::engine::{compute_breakdown, BillConfig};
//! use splitbill_core::{MenuItem, Money, Order, Person};
//!
//! let people = vec![Person::with_id("a", "Alice"), Person::with_id("b", "Bob")];
//! let menu = vec![
//!     MenuItem::with_id("m1", "Nasi Goreng", Money::from_major(70_000), None),
//!     MenuItem::with_id("m2", "Mie Ayam", Money::from_major(50_000), None),
//! ];
//! let orders = vec![
//!     Order::with_id("o1", "a", vec!["m1".into()]),
//!     Order::with_id("o2", "b", vec!["m2".into()]),
//! ];
//!
//! let breakdown = compute_breakdown(&BillConfig::new(people, menu, orders)).unwrap();
//! assert_eq!(breakdown.bill_subtotal, Money::from_major(120_000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod exchange;
pub mod history;
pub mod money;
pub mod state;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use engine::{compute_breakdown, BillConfig, Breakdown, PersonBreakdown};
pub use error::{CoreError, CoreResult, ValidationError};
pub use history::{HistoryEntry, OrderHistory};
pub use money::Money;
pub use state::{BillSettings, BillState, StoredDocument};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Document key used when nobody is signed in.
pub const LOCAL_USER_ID: &str = "local";

/// Minor-unit decimal places of the currency the bills are written in.
///
/// The observed deployment bills in whole Rupiah, so rounded views default
/// to zero decimal places.
pub const DEFAULT_MINOR_UNITS: u32 = 0;

/// Maximum length of a history entry name.
pub const MAX_HISTORY_NAME_LEN: usize = 120;
