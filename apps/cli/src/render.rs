//! Terminal tables for breakdowns and history.

use comfy_table::{Attribute, Cell, CellAlignment, Table};
use splitbill_core::engine::{person_items, BillConfig, Breakdown};
use splitbill_core::{HistoryEntry, Money};

fn amount(value: Money, scale: u32) -> Cell {
    Cell::new(value.round(scale)).set_alignment(CellAlignment::Right)
}

fn bold(text: impl ToString) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

/// Per-person shares plus the amount each person pays.
pub fn breakdown_table(breakdown: &Breakdown, scale: u32) -> Table {
    let settlement = breakdown.settlement(scale);

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Person"),
        Cell::new("Subtotal"),
        Cell::new("Discount"),
        Cell::new("Tax"),
        Cell::new("Shipping"),
        Cell::new("Other"),
        Cell::new("Total"),
        Cell::new("Pays"),
    ]);

    for (person, paid) in breakdown.people.iter().zip(&settlement) {
        table.add_row(vec![
            Cell::new(&person.name),
            amount(person.raw_subtotal, scale),
            amount(person.discount_share, scale),
            amount(person.tax_share, scale),
            amount(person.shipping_share, scale),
            amount(person.other_share, scale),
            amount(person.total, scale),
            amount(paid.amount, scale).add_attribute(Attribute::Bold),
        ]);
    }

    table
}

/// Bill-level totals.
pub fn totals_table(breakdown: &Breakdown, scale: u32) -> Table {
    let mut table = Table::new();
    table.add_row(vec![Cell::new("Subtotal"), amount(breakdown.bill_subtotal, scale)]);
    table.add_row(vec![
        Cell::new("After discount"),
        amount(breakdown.discounted_subtotal, scale),
    ]);
    table.add_row(vec![Cell::new("Tax"), amount(breakdown.tax_amount, scale)]);
    table.add_row(vec![
        bold("Total bill"),
        amount(breakdown.total_bill, scale).add_attribute(Attribute::Bold),
    ]);

    let unallocated = breakdown.unallocated().round(scale);
    if !unallocated.is_zero() {
        table.add_row(vec![Cell::new("Not carried by anyone"), amount(unallocated, scale)]);
    }

    table
}

/// What each person ordered, one row per distinct item.
pub fn items_table(config: &BillConfig, breakdown: &Breakdown, scale: u32) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Person"),
        Cell::new("Item"),
        Cell::new("Qty"),
        Cell::new("Line total"),
    ]);

    for person in &breakdown.people {
        for line in person_items(config, &person.person_id) {
            table.add_row(vec![
                Cell::new(&person.name),
                Cell::new(&line.item.name),
                Cell::new(line.quantity).set_alignment(CellAlignment::Right),
                amount(line.line_total(), scale),
            ]);
        }
    }

    table
}

/// One row per archived bill, newest first.
pub fn history_table(entries: &[HistoryEntry], scale: u32) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("ID"),
        Cell::new("Name"),
        Cell::new("Bill date"),
        Cell::new("Saved"),
        Cell::new("People"),
        Cell::new("Total"),
    ]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.id),
            Cell::new(&entry.name),
            Cell::new(entry.bill_date.format("%d-%m-%Y")),
            Cell::new(entry.saved_at.format("%d-%m-%Y")),
            Cell::new(entry.people.len()).set_alignment(CellAlignment::Right),
            amount(entry.total_bill, scale),
        ]);
    }

    table
}

/// An archived bill's figures and final amounts.
pub fn entry_table(entry: &HistoryEntry, scale: u32) -> Table {
    let mut table = Table::new();
    table.set_header(vec![Cell::new(&entry.name), Cell::new("")]);

    if !entry.restaurant_name.is_empty() {
        table.add_row(vec![Cell::new("Restaurant"), Cell::new(&entry.restaurant_name)]);
    }
    table.add_row(vec![
        Cell::new("Bill date"),
        Cell::new(entry.bill_date.format("%d-%m-%Y")),
    ]);
    table.add_row(vec![Cell::new("Subtotal"), amount(entry.subtotal, scale)]);
    table.add_row(vec![Cell::new("Discount"), amount(entry.discount, scale)]);
    table.add_row(vec![
        Cell::new(format!("Tax ({}%, {:?})", entry.tax_rate.value().normalize(), entry.tax_method)),
        amount(entry.tax, scale),
    ]);
    table.add_row(vec![Cell::new("Shipping"), amount(entry.shipping_cost, scale)]);
    table.add_row(vec![Cell::new("Other"), amount(entry.other_cost, scale)]);
    table.add_row(vec![bold("Total bill"), amount(entry.total_bill, scale)]);

    for person in &entry.people {
        if let Some(total) = entry.final_amounts.get(&person.id) {
            table.add_row(vec![Cell::new(&person.name), amount(*total, scale)]);
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitbill_core::engine::compute_breakdown;
    use splitbill_core::{Adjustment, MenuItem, Order, Person};

    fn config() -> BillConfig {
        BillConfig::new(
            vec![
                Person::with_id("a", "Ayu"),
                Person::with_id("b", "Budi"),
                Person::with_id("c", "Citra"),
            ],
            vec![MenuItem::with_id("m1", "Sate", Money::from_major(30_000), None)],
            vec![
                Order::with_id("o1", "a", vec!["m1".into()]),
                Order::with_id("o2", "b", vec!["m1".into()]),
                Order::with_id("o3", "c", vec!["m1".into()]),
            ],
        )
        .with_shipping(Adjustment::equal(Money::from_major(10_000)))
    }

    #[test]
    fn test_breakdown_table_shows_settled_amounts() {
        let breakdown = compute_breakdown(&config()).unwrap();
        let rendered = breakdown_table(&breakdown, 0).to_string();

        assert!(rendered.contains("Ayu"));
        assert!(rendered.contains("Citra"));
        // 33333.33… settles as 33334 for the first person
        assert!(rendered.contains("33334"));
        assert!(rendered.contains("33333"));
    }

    #[test]
    fn test_totals_table() {
        let breakdown = compute_breakdown(&config()).unwrap();
        let rendered = totals_table(&breakdown, 0).to_string();

        assert!(rendered.contains("100000"));
        assert!(!rendered.contains("Not carried"));
    }

    #[test]
    fn test_totals_table_reports_uncarried_discount() {
        let mut config = config().exclude_no_order(false);
        config.orders.clear();
        let config = config.with_discount(Adjustment::proportional(Money::from_major(4_000)));
        let rendered = totals_table(&compute_breakdown(&config).unwrap(), 0).to_string();

        assert!(rendered.contains("Not carried by anyone"));
        assert!(rendered.contains("-4000"));
    }

    #[test]
    fn test_items_table() {
        let config = config();
        let breakdown = compute_breakdown(&config).unwrap();
        let rendered = items_table(&config, &breakdown, 0).to_string();

        assert!(rendered.contains("Sate"));
        assert!(rendered.contains("30000"));
    }
}
