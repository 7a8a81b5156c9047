//! # Splitting Engine
//!
//! Turns an immutable [`BillConfig`] into a per-person [`Breakdown`] that
//! reconciles with the bill total.
//!
//! ## Computation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      compute_breakdown(config)                          │
//! │                                                                         │
//! │  menu items ──► ItemIndex (scope filter, resolve-or-zero)               │
//! │                     │                                                   │
//! │  orders ────────────┴──► raw subtotal per person                        │
//! │                               │                                         │
//! │                  excludeNoOrder? keep rawSubtotal > 0                   │
//! │                               │                                         │
//! │   bill subtotal = Σ raw ──► − discount ──► discounted subtotal          │
//! │                                               │                         │
//! │           tax base: before = discounted                                 │
//! │                     after  = discounted + shipping + other              │
//! │                                               │                         │
//! │   total = discounted + tax + shipping + other                           │
//! │                                                                         │
//! │   per person: raw − discount share + shipping + tax + other shares     │
//! │               (equal = total / included, proportional = by raw)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Pure and deterministic: no I/O, no clock, output order = input order.
//! - Dangling person or item ids contribute zero; they never fail.
//! - Every figure is exact. Rounding only happens in [`Breakdown::rounded`]
//!   and [`Breakdown::settlement`].

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{
    Adjustment, Distribution, MenuItem, Order, Percentage, Person, TaxMethod, TaxSetting,
    ValidationMode,
};

// =============================================================================
// Bill Config
// =============================================================================

/// Everything the engine needs, captured as one immutable value.
///
/// Built by the caller (usually [`crate::state::BillState::to_config`]) each
/// time a breakdown is wanted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillConfig {
    pub people: Vec<Person>,
    pub menu_items: Vec<MenuItem>,
    pub orders: Vec<Order>,
    /// Only items of this restaurant participate when set.
    pub restaurant_scope: Option<String>,
    /// Drop people whose raw subtotal is not positive.
    pub exclude_no_order: bool,
    pub discount: Adjustment,
    pub shipping: Adjustment,
    pub other: Adjustment,
    pub tax: TaxSetting,
    pub mode: ValidationMode,
}

impl Default for BillConfig {
    fn default() -> Self {
        Self {
            people: Vec::new(),
            menu_items: Vec::new(),
            orders: Vec::new(),
            restaurant_scope: None,
            exclude_no_order: true,
            discount: Adjustment::proportional(Money::zero()),
            shipping: Adjustment::equal(Money::zero()),
            other: Adjustment::equal(Money::zero()),
            tax: TaxSetting::default(),
            mode: ValidationMode::Permissive,
        }
    }
}

impl BillConfig {
    /// Creates a config with no adjustments and default policies.
    pub fn new(people: Vec<Person>, menu_items: Vec<MenuItem>, orders: Vec<Order>) -> Self {
        Self {
            people,
            menu_items,
            orders,
            ..Default::default()
        }
    }

    /// Builder method to scope the bill to one restaurant.
    pub fn with_scope(mut self, restaurant_id: impl Into<String>) -> Self {
        self.restaurant_scope = Some(restaurant_id.into());
        self
    }

    /// Builder method to set the discount.
    pub fn with_discount(mut self, discount: Adjustment) -> Self {
        self.discount = discount;
        self
    }

    /// Builder method to set the shipping cost.
    pub fn with_shipping(mut self, shipping: Adjustment) -> Self {
        self.shipping = shipping;
        self
    }

    /// Builder method to set other costs.
    pub fn with_other(mut self, other: Adjustment) -> Self {
        self.other = other;
        self
    }

    /// Builder method to set the tax.
    pub fn with_tax(mut self, tax: TaxSetting) -> Self {
        self.tax = tax;
        self
    }

    /// Builder method to toggle exclusion of people without orders.
    pub fn exclude_no_order(mut self, exclude: bool) -> Self {
        self.exclude_no_order = exclude;
        self
    }

    /// Builder method to set the validation mode.
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    fn scope(&self) -> Option<&str> {
        self.restaurant_scope.as_deref().filter(|id| !id.is_empty())
    }

    /// The tax rate the engine will apply, clamped or checked per mode.
    pub fn effective_tax_rate(&self) -> CoreResult<Percentage> {
        match self.mode {
            ValidationMode::Permissive => Ok(self.tax.rate.clamped()),
            ValidationMode::Strict if self.tax.rate.is_within_bounds() => Ok(self.tax.rate),
            ValidationMode::Strict => Err(CoreError::TaxRateOutOfRange {
                rate: self.tax.rate.value(),
            }),
        }
    }

    fn check_magnitudes(&self) -> CoreResult<()> {
        let adjustments = [
            ("discount", self.discount.amount),
            ("shipping", self.shipping.amount),
            ("other cost", self.other.amount),
        ];
        for (field, amount) in adjustments {
            if amount.is_negative() {
                return Err(CoreError::NegativeAmount {
                    field: field.to_string(),
                    amount,
                });
            }
        }

        let scope = self.scope();
        let negative = self
            .menu_items
            .iter()
            .filter(|item| scope.map_or(true, |id| item.belongs_to(id)))
            .find(|item| item.price.is_negative());
        if let Some(item) = negative {
            return Err(CoreError::NegativeAmount {
                field: format!("price of {}", item.name),
                amount: item.price,
            });
        }

        Ok(())
    }
}

// =============================================================================
// Item Index (resolve-or-zero)
// =============================================================================

/// Menu items visible under the active scope, keyed by id.
///
/// The single place where an item id is turned into a price. Unknown and
/// out-of-scope ids resolve to nothing and therefore cost nothing.
#[derive(Debug)]
pub struct ItemIndex<'a> {
    items: HashMap<&'a str, &'a MenuItem>,
}

impl<'a> ItemIndex<'a> {
    /// Indexes `menu_items`, keeping only those of `scope` when given.
    /// With duplicated ids the first item wins.
    pub fn new(menu_items: &'a [MenuItem], scope: Option<&str>) -> Self {
        let mut items = HashMap::with_capacity(menu_items.len());
        for item in menu_items {
            if scope.is_some_and(|id| !item.belongs_to(id)) {
                continue;
            }
            items.entry(item.id.as_str()).or_insert(item);
        }
        Self { items }
    }

    /// Looks an item up; `None` for unknown or out-of-scope ids.
    pub fn resolve(&self, item_id: &str) -> Option<&'a MenuItem> {
        self.items.get(item_id).copied()
    }

    /// Price of an item, or zero when it does not resolve.
    pub fn price_or_zero(&self, item_id: &str) -> Money {
        self.resolve(item_id)
            .map(|item| item.price)
            .unwrap_or_default()
    }
}

// =============================================================================
// Breakdown
// =============================================================================

/// One person's line in the breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PersonBreakdown {
    pub person_id: String,
    pub name: String,
    pub raw_subtotal: Money,
    pub discount_share: Money,
    pub tax_share: Money,
    pub shipping_share: Money,
    pub other_share: Money,
    /// `raw − discount + shipping + tax + other`
    pub total: Money,
}

impl PersonBreakdown {
    fn round(&self, scale: u32) -> Self {
        Self {
            person_id: self.person_id.clone(),
            name: self.name.clone(),
            raw_subtotal: self.raw_subtotal.round(scale),
            discount_share: self.discount_share.round(scale),
            tax_share: self.tax_share.round(scale),
            shipping_share: self.shipping_share.round(scale),
            other_share: self.other_share.round(scale),
            total: self.total.round(scale),
        }
    }
}

/// Engine output: included people in input order plus bill-level totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Breakdown {
    pub people: Vec<PersonBreakdown>,
    pub bill_subtotal: Money,
    pub discounted_subtotal: Money,
    pub tax_amount: Money,
    pub total_bill: Money,
    /// Adjustments with nobody to carry them (see [`Breakdown::unallocated`]).
    #[serde(default)]
    pub unallocated: Money,
}

/// What one person actually pays after settlement rounding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Settlement {
    pub person_id: String,
    pub name: String,
    pub amount: Money,
}

impl Breakdown {
    /// Looks up a person's line.
    pub fn person(&self, person_id: &str) -> Option<&PersonBreakdown> {
        self.people.iter().find(|p| p.person_id == person_id)
    }

    /// Σ person totals.
    pub fn allocated(&self) -> Money {
        self.people.iter().map(|p| p.total).sum()
    }

    /// Part of the bill nobody carries.
    ///
    /// Worked out from the shape of the bill, not as `totalBill − Σ total`:
    /// with no included people it is the whole bill, otherwise it is the sum
    /// of proportional adjustments spread over a zero subtotal (the discount
    /// counted negative). Division residue of equal shares never shows up
    /// here.
    pub fn unallocated(&self) -> Money {
        self.unallocated
    }

    /// Person id → exact total, as stored in history entries.
    pub fn final_amounts(&self) -> BTreeMap<String, Money> {
        self.people
            .iter()
            .map(|p| (p.person_id.clone(), p.total))
            .collect()
    }

    /// Every figure rounded half to even at `scale`, for display.
    ///
    /// Rounded person totals may differ from the rounded bill total by a
    /// few minor units; use [`Breakdown::settlement`] for amounts to pay.
    pub fn rounded(&self, scale: u32) -> Breakdown {
        Breakdown {
            people: self.people.iter().map(|p| p.round(scale)).collect(),
            bill_subtotal: self.bill_subtotal.round(scale),
            discounted_subtotal: self.discounted_subtotal.round(scale),
            tax_amount: self.tax_amount.round(scale),
            total_bill: self.total_bill.round(scale),
            unallocated: self.unallocated.round(scale),
        }
    }

    /// Amounts to pay at `scale`, summing exactly to the rounded Σ of exact
    /// person totals.
    ///
    /// ## Largest Remainder
    /// ```text
    /// totals   33.33…  33.33…  33.33…   (Σ = 100)
    /// floor    33      33      33       (Σ = 99, short by 1)
    /// + unit   34      33      33       (largest remainder first,
    ///                                    ties to the earlier person)
    /// ```
    pub fn settlement(&self, scale: u32) -> Vec<Settlement> {
        let unit = Money::unit(scale);
        let target = self.allocated().round(scale);

        let mut amounts: Vec<Money> = self.people.iter().map(|p| p.total.floor(scale)).collect();
        let floored: Money = amounts.iter().sum();

        let mut by_remainder: Vec<usize> = (0..self.people.len()).collect();
        // Stable sort keeps input order among equal remainders.
        by_remainder.sort_by(|&a, &b| {
            let rem_a = self.people[a].total - amounts[a];
            let rem_b = self.people[b].total - amounts[b];
            rem_b.cmp(&rem_a)
        });

        let mut short = target - floored;
        for idx in by_remainder {
            if !short.is_positive() {
                break;
            }
            amounts[idx] += unit;
            short -= unit;
        }

        self.people
            .iter()
            .zip(amounts)
            .map(|(p, amount)| Settlement {
                person_id: p.person_id.clone(),
                name: p.name.clone(),
                amount,
            })
            .collect()
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Computes the per-person breakdown of a bill.
///
/// ## Errors
/// Only in [`ValidationMode::Strict`]: a tax rate outside `[0, 100]`
/// ([`CoreError::TaxRateOutOfRange`]) or a negative amount or in-scope
/// price ([`CoreError::NegativeAmount`]).
///
/// ## Example
/// ```rust
/// use splitbill_core::engine::{compute_breakdown, BillConfig};
/// use splitbill_core::types::{Adjustment, Distribution, Percentage, TaxMethod, TaxSetting};
/// use splitbill_core::{MenuItem, Money, Order, Person};
///
/// let config = BillConfig::new(
///     vec![Person::with_id("a", "A"), Person::with_id("b", "B")],
///     vec![MenuItem::with_id("burger", "Burger", Money::from_major(50_000), None)],
///     vec![
///         Order::with_id("o1", "a", vec!["burger".into()]),
///         Order::with_id("o2", "b", vec!["burger".into()]),
///     ],
/// )
/// .with_shipping(Adjustment::equal(Money::from_major(10_000)))
/// .with_tax(TaxSetting::new(Percentage::from_whole(10), TaxMethod::Before, Distribution::Equal));
///
/// let breakdown = compute_breakdown(&config).unwrap();
/// assert_eq!(breakdown.total_bill, Money::from_major(120_000));
/// assert_eq!(breakdown.allocated(), breakdown.total_bill);
/// ```
pub fn compute_breakdown(config: &BillConfig) -> CoreResult<Breakdown> {
    let tax_rate = config.effective_tax_rate()?;
    if config.mode == ValidationMode::Strict {
        config.check_magnitudes()?;
    }
    let index = ItemIndex::new(&config.menu_items, config.scope());

    let subtotals = raw_subtotals(config, &index);
    let included: Vec<(&Person, Money)> = if config.exclude_no_order {
        subtotals
            .into_iter()
            .filter(|(_, raw)| raw.is_positive())
            .collect()
    } else {
        subtotals
    };

    let bill_subtotal: Money = included.iter().map(|(_, raw)| *raw).sum();
    let discounted_subtotal = bill_subtotal - config.discount.amount;
    let tax_base = match config.tax.method {
        TaxMethod::Before => discounted_subtotal,
        TaxMethod::After => {
            discounted_subtotal + config.shipping.amount + config.other.amount
        }
    };
    let tax_amount = if tax_rate.is_positive() {
        tax_base.percent(tax_rate)
    } else {
        Money::zero()
    };
    let total_bill =
        discounted_subtotal + tax_amount + config.shipping.amount + config.other.amount;

    let shares = ShareCalculator {
        bill_subtotal,
        headcount: included.len(),
    };
    let unallocated = if shares.headcount == 0 {
        total_bill
    } else {
        -shares.uncarried(config.discount.distribution, config.discount.amount)
            + shares.uncarried(config.tax.distribution, tax_amount)
            + shares.uncarried(config.shipping.distribution, config.shipping.amount)
            + shares.uncarried(config.other.distribution, config.other.amount)
    };

    let people = included
        .into_iter()
        .map(|(person, raw)| {
            let discount_share =
                shares.share(config.discount.distribution, config.discount.amount, raw);
            let tax_share = shares.share(config.tax.distribution, tax_amount, raw);
            let shipping_share =
                shares.share(config.shipping.distribution, config.shipping.amount, raw);
            let other_share = shares.share(config.other.distribution, config.other.amount, raw);

            PersonBreakdown {
                person_id: person.id.clone(),
                name: person.name.clone(),
                raw_subtotal: raw,
                discount_share,
                tax_share,
                shipping_share,
                other_share,
                total: raw - discount_share + shipping_share + tax_share + other_share,
            }
        })
        .collect();

    Ok(Breakdown {
        people,
        bill_subtotal,
        discounted_subtotal,
        tax_amount,
        total_bill,
        unallocated,
    })
}

/// Raw subtotal of every distinct person, in input order.
fn raw_subtotals<'a>(config: &'a BillConfig, index: &ItemIndex<'_>) -> Vec<(&'a Person, Money)> {
    let mut seen = HashSet::new();
    let mut subtotals: Vec<(&Person, Money)> = config
        .people
        .iter()
        .filter(|person| seen.insert(person.id.as_str()))
        .map(|person| (person, Money::zero()))
        .collect();

    let slots: HashMap<&str, usize> = subtotals
        .iter()
        .enumerate()
        .map(|(slot, &(person, _))| (person.id.as_str(), slot))
        .collect();

    for order in &config.orders {
        let Some(&slot) = slots.get(order.person_id.as_str()) else {
            debug!(order_id = %order.id, person_id = %order.person_id, "Skipping order of unknown person");
            continue;
        };

        for item_id in &order.items {
            if index.resolve(item_id).is_none() {
                debug!(order_id = %order.id, item_id = %item_id, "Item unknown or out of scope, counted as zero");
            }
            subtotals[slot].1 += index.price_or_zero(item_id);
        }
    }

    subtotals
}

struct ShareCalculator {
    bill_subtotal: Money,
    headcount: usize,
}

impl ShareCalculator {
    fn share(&self, distribution: Distribution, total: Money, raw: Money) -> Money {
        match distribution {
            Distribution::Equal => total.split(self.headcount),
            Distribution::Proportional => total.proportion(raw, self.bill_subtotal),
        }
    }

    /// The part of `total` no share picks up.
    fn uncarried(&self, distribution: Distribution, total: Money) -> Money {
        match distribution {
            Distribution::Proportional if self.bill_subtotal.is_zero() => total,
            _ => Money::zero(),
        }
    }
}

// =============================================================================
// Item Lines
// =============================================================================

/// One grouped item of a person's orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemLine<'a> {
    pub item: &'a MenuItem,
    pub quantity: u32,
}

impl ItemLine<'_> {
    pub fn line_total(&self) -> Money {
        self.item.price * i64::from(self.quantity)
    }
}

/// Groups the scoped, resolvable items a person ordered, first-seen order.
pub fn person_items<'a>(config: &'a BillConfig, person_id: &str) -> Vec<ItemLine<'a>> {
    let index = ItemIndex::new(&config.menu_items, config.scope());
    let mut lines: Vec<ItemLine<'a>> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    let item_ids = config
        .orders
        .iter()
        .filter(|order| order.person_id == person_id)
        .flat_map(|order| order.items.iter());

    for item_id in item_ids {
        let Some(item) = index.resolve(item_id) else {
            continue;
        };
        match positions.get(item.id.as_str()) {
            Some(&pos) => lines[pos].quantity += 1,
            None => {
                positions.insert(item.id.as_str(), lines.len());
                lines.push(ItemLine { item, quantity: 1 });
            }
        }
    }

    lines
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn m(units: i64) -> Money {
        Money::from_major(units)
    }

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Two people, Burger 50000 and Fries 20000; A: Burger + Fries, B: Burger.
    fn burger_bill() -> BillConfig {
        BillConfig::new(
            vec![Person::with_id("a", "A"), Person::with_id("b", "B")],
            vec![
                MenuItem::with_id("burger", "Burger", m(50_000), Some("r1".into())),
                MenuItem::with_id("fries", "Fries", m(20_000), Some("r1".into())),
            ],
            vec![
                Order::with_id("o1", "a", ids(&["burger", "fries"])),
                Order::with_id("o2", "b", ids(&["burger"])),
            ],
        )
        .with_shipping(Adjustment::equal(m(10_000)))
        .with_tax(TaxSetting::new(
            Percentage::from_whole(10),
            TaxMethod::Before,
            Distribution::Equal,
        ))
    }

    fn three_equal_people() -> BillConfig {
        BillConfig::new(
            vec![
                Person::with_id("a", "A"),
                Person::with_id("b", "B"),
                Person::with_id("c", "C"),
            ],
            vec![MenuItem::with_id("tea", "Tea", m(5_000), None)],
            vec![
                Order::with_id("o1", "a", ids(&["tea"])),
                Order::with_id("o2", "b", ids(&["tea"])),
                Order::with_id("o3", "c", ids(&["tea"])),
            ],
        )
        .with_shipping(Adjustment::equal(m(10_000)))
    }

    #[test]
    fn test_scenario_shipping_and_tax() {
        let breakdown = compute_breakdown(&burger_bill()).unwrap();

        assert_eq!(breakdown.bill_subtotal, m(120_000));
        assert_eq!(breakdown.discounted_subtotal, m(120_000));
        assert_eq!(breakdown.tax_amount, m(12_000));
        assert_eq!(breakdown.total_bill, m(142_000));

        let a = breakdown.person("a").unwrap();
        assert_eq!(a.raw_subtotal, m(70_000));
        assert_eq!(a.shipping_share, m(5_000));
        assert_eq!(a.tax_share, m(6_000));
        assert_eq!(a.total, m(81_000));

        let b = breakdown.person("b").unwrap();
        assert_eq!(b.raw_subtotal, m(50_000));
        assert_eq!(b.total, m(61_000));

        assert_eq!(breakdown.allocated(), m(142_000));
    }

    #[test]
    fn test_scenario_proportional_discount() {
        let config = burger_bill().with_discount(Adjustment::proportional(m(12_000)));
        let breakdown = compute_breakdown(&config).unwrap();

        assert_eq!(breakdown.discounted_subtotal, m(108_000));
        assert_eq!(breakdown.tax_amount, m(10_800));
        assert_eq!(breakdown.total_bill, m(128_800));

        let a = breakdown.person("a").unwrap();
        assert_eq!(a.discount_share, m(7_000));
        assert_eq!(a.tax_share, m(5_400));
        assert_eq!(a.total, m(73_400));

        let b = breakdown.person("b").unwrap();
        assert_eq!(b.discount_share, m(5_000));
        assert_eq!(b.total, m(55_400));

        assert_eq!(breakdown.allocated(), breakdown.total_bill);
    }

    #[test]
    fn test_tax_after_includes_shipping_and_other() {
        let config = burger_bill()
            .with_other(Adjustment::equal(m(2_000)))
            .with_tax(TaxSetting::new(
                Percentage::from_whole(10),
                TaxMethod::After,
                Distribution::Proportional,
            ));
        let breakdown = compute_breakdown(&config).unwrap();

        // (120000 + 10000 + 2000) × 10%
        assert_eq!(breakdown.tax_amount, m(13_200));
        assert_eq!(breakdown.total_bill, m(145_200));
        assert_eq!(breakdown.person("a").unwrap().tax_share, m(7_700));
        assert_eq!(breakdown.person("b").unwrap().tax_share, m(5_500));
        assert_eq!(breakdown.allocated(), breakdown.total_bill);
    }

    #[test]
    fn test_reconciles_within_one_unit_on_thirds() {
        let breakdown = compute_breakdown(&three_equal_people()).unwrap();

        assert_eq!(breakdown.total_bill, m(25_000));
        assert!((breakdown.allocated() - breakdown.total_bill).abs() < Money::unit(0));
        assert_eq!(breakdown.unallocated(), Money::zero());
        assert_eq!(
            breakdown.bill_subtotal,
            breakdown.people.iter().map(|p| p.raw_subtotal).sum::<Money>()
        );
    }

    #[test]
    fn test_settlement_sums_exactly_and_ties_go_first() {
        let breakdown = compute_breakdown(&three_equal_people()).unwrap();
        let settlement = breakdown.settlement(0);

        // 8333.33… each; the spare unit goes to the first person.
        let amounts: Vec<Money> = settlement.iter().map(|s| s.amount).collect();
        assert_eq!(amounts, vec![m(8_334), m(8_333), m(8_333)]);
        assert_eq!(amounts.iter().sum::<Money>(), m(25_000));
    }

    #[test]
    fn test_settlement_prefers_largest_remainder() {
        let breakdown = Breakdown {
            people: vec![
                line("a", Money::from_minor(102, 1)),
                line("b", Money::from_minor(107, 1)),
                line("c", Money::from_minor(101, 1)),
            ],
            bill_subtotal: m(31),
            discounted_subtotal: m(31),
            tax_amount: Money::zero(),
            total_bill: m(31),
            unallocated: Money::zero(),
        };

        let amounts: Vec<Money> = breakdown.settlement(0).iter().map(|s| s.amount).collect();
        assert_eq!(amounts, vec![m(10), m(11), m(10)]);
    }

    fn line(id: &str, total: Money) -> PersonBreakdown {
        PersonBreakdown {
            person_id: id.to_string(),
            name: id.to_uppercase(),
            raw_subtotal: total,
            discount_share: Money::zero(),
            tax_share: Money::zero(),
            shipping_share: Money::zero(),
            other_share: Money::zero(),
            total,
        }
    }

    #[test]
    fn test_rounded_view_uses_half_even() {
        let breakdown = Breakdown {
            people: vec![line("a", Money::from_minor(25, 1)), line("b", Money::from_minor(35, 1))],
            bill_subtotal: m(6),
            discounted_subtotal: m(6),
            tax_amount: Money::zero(),
            total_bill: m(6),
            unallocated: Money::zero(),
        };
        let rounded = breakdown.rounded(0);

        assert_eq!(rounded.people[0].total, m(2));
        assert_eq!(rounded.people[1].total, m(4));
    }

    #[test]
    fn test_empty_people_keeps_fixed_costs() {
        let config = BillConfig::default()
            .with_shipping(Adjustment::equal(m(10_000)))
            .with_other(Adjustment::equal(m(2_000)))
            .with_tax(TaxSetting::new(
                Percentage::from_whole(10),
                TaxMethod::After,
                Distribution::Equal,
            ));
        let breakdown = compute_breakdown(&config).unwrap();

        assert!(breakdown.people.is_empty());
        assert_eq!(breakdown.bill_subtotal, Money::zero());
        assert_eq!(breakdown.tax_amount, m(1_200));
        assert_eq!(breakdown.total_bill, m(13_200));
        assert_eq!(breakdown.unallocated(), m(13_200));
    }

    #[test]
    fn test_no_orders_excludes_everyone() {
        let mut config = burger_bill();
        config.orders.clear();
        let breakdown = compute_breakdown(&config).unwrap();

        assert!(breakdown.people.is_empty());
        assert_eq!(breakdown.bill_subtotal, Money::zero());
        assert_eq!(breakdown.total_bill, m(10_000));
    }

    #[test]
    fn test_include_people_without_orders() {
        let mut config = burger_bill().exclude_no_order(false);
        config.people.push(Person::with_id("c", "C"));
        let breakdown = compute_breakdown(&config).unwrap();

        assert_eq!(breakdown.people.len(), 3);
        let c = breakdown.person("c").unwrap();
        assert_eq!(c.raw_subtotal, Money::zero());
        assert_eq!(c.shipping_share, m(10_000).split(3));
        assert!((breakdown.allocated() - breakdown.total_bill).abs() < Money::unit(0));
    }

    #[test]
    fn test_proportional_over_zero_subtotal_is_zero() {
        let config = BillConfig::new(
            vec![Person::with_id("a", "A"), Person::with_id("b", "B")],
            vec![],
            vec![],
        )
        .exclude_no_order(false)
        .with_discount(Adjustment::proportional(m(5_000)))
        .with_shipping(Adjustment::proportional(m(10_000)));
        let breakdown = compute_breakdown(&config).unwrap();

        for person in &breakdown.people {
            assert_eq!(person.discount_share, Money::zero());
            assert_eq!(person.shipping_share, Money::zero());
            assert_eq!(person.total, Money::zero());
        }
        assert_eq!(breakdown.total_bill, m(5_000));
        assert_eq!(breakdown.unallocated(), m(5_000));
    }

    #[test]
    fn test_equal_and_proportional_agree_on_uniform_subtotals() {
        let people: Vec<Person> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| Person::with_id(*id, id.to_uppercase()))
            .collect();
        let orders: Vec<Order> = people
            .iter()
            .map(|p| Order::new(p.id.clone(), ids(&["tea"])))
            .collect();
        let base = BillConfig::new(
            people,
            vec![MenuItem::with_id("tea", "Tea", m(10_000), None)],
            orders,
        );

        let equal = compute_breakdown(
            &base
                .clone()
                .with_discount(Adjustment::equal(m(10_000)))
                .with_shipping(Adjustment::equal(m(6_000))),
        )
        .unwrap();
        let proportional = compute_breakdown(
            &base
                .with_discount(Adjustment::proportional(m(10_000)))
                .with_shipping(Adjustment::proportional(m(6_000))),
        )
        .unwrap();

        assert_eq!(equal, proportional);
    }

    #[test]
    fn test_dangling_references_contribute_zero() {
        let mut config = burger_bill();
        config.orders.push(Order::with_id("o3", "ghost", ids(&["burger"])));
        config.orders.push(Order::with_id("o4", "b", ids(&["deleted-item"])));
        let breakdown = compute_breakdown(&config).unwrap();

        assert_eq!(breakdown.people.len(), 2);
        assert_eq!(breakdown.bill_subtotal, m(120_000));
        assert_eq!(breakdown.person("b").unwrap().raw_subtotal, m(50_000));
    }

    #[test]
    fn test_duplicate_item_ids_count_as_quantity() {
        let mut config = burger_bill();
        config.orders[1].items = ids(&["burger", "burger"]);
        let breakdown = compute_breakdown(&config).unwrap();

        assert_eq!(breakdown.person("b").unwrap().raw_subtotal, m(100_000));

        let lines = person_items(&config, "a");
        assert_eq!(lines.len(), 2);
        let lines = person_items(&config, "b");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].line_total(), m(100_000));
    }

    #[test]
    fn test_duplicate_person_is_counted_once() {
        let mut config = burger_bill();
        config.people.push(Person::with_id("a", "A again"));
        let breakdown = compute_breakdown(&config).unwrap();

        assert_eq!(breakdown.people.len(), 2);
        assert_eq!(breakdown.person("a").unwrap().name, "A");
        assert_eq!(breakdown.bill_subtotal, m(120_000));
    }

    #[test]
    fn test_restaurant_scope_filters_items() {
        let mut config = burger_bill().with_scope("r1");
        config.people.push(Person::with_id("c", "C"));
        config
            .menu_items
            .push(MenuItem::with_id("satay", "Satay", m(30_000), Some("r2".into())));
        config.orders.push(Order::with_id("o3", "a", ids(&["satay", "fries"])));
        config.orders.push(Order::with_id("o4", "c", ids(&["satay"])));
        let breakdown = compute_breakdown(&config).unwrap();

        // C only ordered at r2 and drops out; A's satay is ignored but fries count.
        assert!(breakdown.person("c").is_none());
        assert_eq!(breakdown.person("a").unwrap().raw_subtotal, m(90_000));
        assert_eq!(breakdown.bill_subtotal, m(140_000));

        let lines = person_items(&config, "a");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].item.id, "fries");
        assert_eq!(lines[1].quantity, 2);
    }

    #[test]
    fn test_permissive_clamps_tax_rate() {
        let config = burger_bill().with_tax(TaxSetting::new(
            Percentage::from_whole(150),
            TaxMethod::Before,
            Distribution::Equal,
        ));
        assert_eq!(compute_breakdown(&config).unwrap().tax_amount, m(120_000));

        let config = burger_bill().with_tax(TaxSetting::new(
            Percentage::from_whole(-10),
            TaxMethod::Before,
            Distribution::Equal,
        ));
        assert_eq!(compute_breakdown(&config).unwrap().tax_amount, Money::zero());
    }

    #[test]
    fn test_strict_rejects_out_of_range_input() {
        let config = burger_bill()
            .with_mode(ValidationMode::Strict)
            .with_tax(TaxSetting::new(
                Percentage::from_whole(150),
                TaxMethod::Before,
                Distribution::Equal,
            ));
        assert!(matches!(
            compute_breakdown(&config),
            Err(CoreError::TaxRateOutOfRange { .. })
        ));

        let config = burger_bill()
            .with_mode(ValidationMode::Strict)
            .with_discount(Adjustment::proportional(m(-1)));
        assert!(matches!(
            compute_breakdown(&config),
            Err(CoreError::NegativeAmount { .. })
        ));

        let mut config = burger_bill().with_mode(ValidationMode::Strict);
        config.menu_items[1].price = m(-20_000);
        assert!(matches!(
            compute_breakdown(&config),
            Err(CoreError::NegativeAmount { .. })
        ));

        assert!(compute_breakdown(&burger_bill().with_mode(ValidationMode::Strict)).is_ok());
    }

    #[test]
    fn test_negative_discount_is_not_special_cased() {
        let config = burger_bill().with_discount(Adjustment::equal(m(-2_000)));
        let breakdown = compute_breakdown(&config).unwrap();

        let a = breakdown.person("a").unwrap();
        assert_eq!(a.discount_share, m(-1_000));
        assert_eq!(a.total, a.raw_subtotal + m(1_000) + a.shipping_share + a.tax_share);
        assert_eq!(breakdown.allocated(), breakdown.total_bill);
    }

    #[test]
    fn test_discount_larger_than_subtotal_is_kept() {
        let config = burger_bill().with_discount(Adjustment::proportional(m(150_000)));
        let breakdown = compute_breakdown(&config).unwrap();

        assert_eq!(breakdown.discounted_subtotal, m(-30_000));
        assert_eq!(breakdown.tax_amount, m(-3_000));
        assert_eq!(breakdown.allocated(), breakdown.total_bill);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let config = three_equal_people().with_discount(Adjustment::proportional(m(1_000)));
        let first = serde_json::to_string(&compute_breakdown(&config).unwrap()).unwrap();
        let second = serde_json::to_string(&compute_breakdown(&config).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_large_amounts_compute_without_overflow() {
        let price = m(1_000_000_000_000_000);
        let config = BillConfig::new(
            vec![Person::with_id("a", "A"), Person::with_id("b", "B")],
            vec![
                MenuItem::with_id("big", "Banquet", price, None),
                MenuItem::with_id("tea", "Tea", m(5_000), None),
            ],
            vec![
                Order::with_id("o1", "a", ids(&["big"])),
                Order::with_id("o2", "b", ids(&["tea"])),
            ],
        )
        .with_discount(Adjustment::proportional(price))
        .with_tax(TaxSetting::new(
            Percentage::from_whole(10),
            TaxMethod::After,
            Distribution::Proportional,
        ));
        let breakdown = compute_breakdown(&config).unwrap();

        assert_eq!(breakdown.bill_subtotal, price + m(5_000));
        assert_eq!(breakdown.discounted_subtotal, m(5_000));
        assert_eq!(breakdown.tax_amount, m(500));
        assert!((breakdown.allocated() - breakdown.total_bill).abs() < Money::unit(0));
    }

    #[test]
    fn test_unallocated_counts_only_uncarried_adjustments() {
        let config = BillConfig::new(vec![Person::with_id("a", "A")], vec![], vec![])
            .exclude_no_order(false)
            .with_discount(Adjustment::proportional(m(3_000)))
            .with_shipping(Adjustment::equal(m(9_000)))
            .with_other(Adjustment::proportional(m(1_000)));
        let breakdown = compute_breakdown(&config).unwrap();

        // shipping is carried by A; the discount and other cost are not
        assert_eq!(breakdown.person("a").unwrap().shipping_share, m(9_000));
        assert_eq!(breakdown.unallocated(), m(-2_000));
        assert_eq!(breakdown.allocated() + breakdown.unallocated(), breakdown.total_bill);
    }
}
