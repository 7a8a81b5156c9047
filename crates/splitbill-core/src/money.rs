//! # Money Module
//!
//! Provides the `Money` type for handling monetary values exactly.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Splitting a bill divides constantly:                                   │
//! │    10000 / 3 = 3333.33…  (×3 must still reconcile with 10000)          │
//! │                                                                         │
//! │  OUR SOLUTION: exact decimals, round only at the edge                  │
//! │    Shares stay exact (28 significant digits) through the engine.       │
//! │    Rounding happens once, in a rounded view, with ONE rule.            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Rounding Rule
//! Round half to even (bankers rounding) at `scale` minor-unit decimal
//! places. `scale = 0` for whole Rupiah, `scale = 2` for cents.
//!
//! ## Usage
//! ```rust
//! use splitbill_core::money::Money;
//!
//! let price = Money::from_major(70_000);
//! let doubled = price * 2;
//! assert_eq!(doubled, Money::from_major(140_000));
//!
//! let third = Money::from_major(10_000).split(3);
//! assert_eq!(third.round(0), Money::from_major(3_333));
//! ```

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Percentage;
use crate::validation::ValidationResult;

// =============================================================================
// Money Type
// =============================================================================

/// An exact monetary amount in major currency units.
///
/// ## Design Decisions
/// - **Decimal (signed)**: Negative values are legal input in permissive
///   mode and flow through the arithmetic unchanged
/// - **Saturating operators**: `Decimal` panics past ±7.9e28; every
///   operator here saturates at the bounds instead
/// - **Single field tuple struct**: Zero-cost abstraction over `Decimal`
/// - **JSON number on the wire**: export files and history entries carry
///   plain numbers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] Decimal);

impl Money {
    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// ## Example
    /// ```rust
    /// use splitbill_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(5).to_string(), "5");
    /// ```
    #[inline]
    pub fn from_major(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Creates a Money value from minor units at the given scale.
    ///
    /// ## Example
    /// ```rust
    /// use splitbill_core::money::Money;
    ///
    /// let price = Money::from_minor(1099, 2);
    /// assert_eq!(price.to_string(), "10.99");
    /// ```
    #[inline]
    pub fn from_minor(minor: i64, scale: u32) -> Self {
        Money(Decimal::new(minor, scale))
    }

    /// Converts a floating point amount, rejecting NaN and infinities.
    ///
    /// Front ends hand numbers over as `f64`; this is the only door through
    /// which they enter.
    pub fn from_f64(value: f64) -> ValidationResult<Self> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "amount".to_string(),
            });
        }

        Decimal::from_f64(value)
            .map(Money)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: format!("{value} cannot be represented exactly"),
            })
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Lossy conversion for display layers that need a float.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Smallest representable step at `scale` (1 for scale 0, 0.01 for 2).
    #[inline]
    pub fn unit(scale: u32) -> Self {
        Money(Decimal::new(1, scale))
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Rounds half to even at `scale` decimal places.
    ///
    /// ## Bankers Rounding Explained
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  BANKERS ROUNDING (Round Half to Even)                              │
    /// │                                                                     │
    /// │  Standard rounding always rounds 0.5 UP, causing systematic bias:  │
    /// │    0.5 → 1, 1.5 → 2, 2.5 → 3, 3.5 → 4 (always up = +bias)         │
    /// │                                                                     │
    /// │  Bankers Rounding rounds 0.5 to nearest EVEN number:               │
    /// │    0.5 → 0, 1.5 → 2, 2.5 → 2, 3.5 → 4 (alternates = no bias)      │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    pub fn round(&self, scale: u32) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven),
        )
    }

    /// Rounds toward negative infinity at `scale` decimal places.
    pub fn floor(&self, scale: u32) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(scale, RoundingStrategy::ToNegativeInfinity),
        )
    }

    /// Applies a percentage: `self × rate / 100`.
    ///
    /// ## Example
    /// ```rust
    /// use splitbill_core::money::Money;
    /// use splitbill_core::types::Percentage;
    ///
    /// let base = Money::from_major(108_000);
    /// assert_eq!(base.percent(Percentage::from_whole(10)), Money::from_major(10_800));
    /// ```
    pub fn percent(&self, rate: Percentage) -> Money {
        self.proportion(Money(rate.value()), Money(Decimal::ONE_HUNDRED))
    }

    /// Proportional part of this amount: `self × part / whole`.
    ///
    /// Multiplies first while the product fits, which keeps results such as
    /// `12000 × 70000 / 120000` exact. Past that it divides first; for
    /// `|part| ≤ |whole|` the ratio is at most one and the result cannot
    /// overflow. Anything beyond saturates.
    ///
    /// Returns zero when `whole` is zero.
    pub fn proportion(&self, part: Money, whole: Money) -> Money {
        if whole.is_zero() {
            return Money::zero();
        }

        let exact = self
            .0
            .checked_mul(part.0)
            .and_then(|product| product.checked_div(whole.0));
        let scaled = || {
            part.0
                .checked_div(whole.0)
                .map(|ratio| self.0.saturating_mul(ratio))
        };
        let saturated = || {
            if self.is_zero() || part.is_zero() {
                Decimal::ZERO
            } else if self.is_negative() ^ part.is_negative() ^ whole.is_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        };

        Money(exact.or_else(scaled).unwrap_or_else(saturated))
    }

    /// One of `count` equal parts of this amount.
    ///
    /// Returns zero when `count` is zero.
    pub fn split(&self, count: usize) -> Money {
        if count == 0 {
            return Money::zero();
        }
        Money(
            self.0
                .checked_div(Decimal::from(count))
                .unwrap_or(Decimal::ZERO),
        )
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(Decimal::from(qty)))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal without trailing zeros (`70000`, `3333.5`).
///
/// ## Note
/// Currency symbols and grouping belong to the presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
