//! Plain-text rendering of command results.
//!
//! Every renderer writes to a caller-supplied writer so output can be
//! captured in tests.

use std::io::{self, Write};

use findmystore_core::{CurrencyCode, Price, Store, StoreId};
use findmystore_server::maps;
use findmystore_server::services::alerts::RestockReport;
use findmystore_server::services::inventory::StockInfo;
use findmystore_server::services::optimizer::ShoppingListOutcome;
use findmystore_server::services::pricing::{self, CheapestOffer, PriceComparison};
use rust_decimal::Decimal;

fn money(amount: Decimal, currency: CurrencyCode) -> String {
    Price::new(amount, currency).to_string()
}

fn optional_money(amount: Option<Decimal>, currency: CurrencyCode) -> String {
    amount.map_or_else(|| "—".to_string(), |a| money(a, currency))
}

fn stars(store: &Store) -> String {
    "★".repeat(store.stars())
}

/// Store list with ratings and map links.
pub fn stores(out: &mut impl Write, stores: &[Store]) -> io::Result<()> {
    if stores.is_empty() {
        return writeln!(out, "No stores found.");
    }

    writeln!(out, "{} store(s):", stores.len())?;
    for store in stores {
        let verified = if store.verified { " [verified]" } else { "" };
        writeln!(
            out,
            "  #{:<3} {} ({}) {} {:.1}{verified}",
            store.id,
            store.name,
            store.category,
            stars(store),
            store.rating
        )?;
        if store.address.is_empty() {
            writeln!(out, "       {} · {}", store.city, store.hours)?;
        } else {
            writeln!(out, "       {} · {}", store.address, store.hours)?;
        }
        writeln!(out, "       {}", maps::place_link(store))?;
    }
    Ok(())
}

pub fn stock(out: &mut impl Write, info: &StockInfo, currency: CurrencyCode) -> io::Result<()> {
    writeln!(
        out,
        "Store {}: '{}' qty {} at {}",
        info.store_id,
        info.product,
        info.quantity,
        optional_money(info.price, currency)
    )
}

pub fn cheapest(
    out: &mut impl Write,
    product: &str,
    offer: Option<&CheapestOffer>,
    currency: CurrencyCode,
) -> io::Result<()> {
    let Some(offer) = offer else {
        return writeln!(out, "{}", pricing::not_found_message(product));
    };

    writeln!(
        out,
        "Cheapest '{}': {} at {} (#{}, {} in stock)",
        offer.stock.product,
        money(offer.price(), currency),
        offer.store.name,
        offer.store.id,
        offer.stock.quantity
    )?;
    writeln!(out, "  {}", maps::place_link(&offer.store))
}

/// Comparison table, most stock first, with the cheapest option highlighted.
pub fn comparison(
    out: &mut impl Write,
    comparison: &PriceComparison,
    currency: CurrencyCode,
) -> io::Result<()> {
    writeln!(out, "Price comparison for '{}':", comparison.product)?;
    for row in &comparison.rows {
        let verified = if row.verified { "✓" } else { " " };
        writeln!(
            out,
            "  #{:<3} {verified} {:<32} {:<12} qty {:>3}  {:>8}",
            row.store_id,
            row.store,
            row.category,
            row.qty,
            optional_money(row.price, currency)
        )?;
    }

    match comparison.cheapest() {
        Some(row) => writeln!(
            out,
            "Cheapest option: {} at {}\n  {}",
            row.store,
            optional_money(row.price, currency),
            row.map
        ),
        None => writeln!(out, "No store has '{}' in stock.", comparison.product),
    }
}

/// Shopping plan, naming each store when it is in `stores`.
pub fn shopping_plan(
    out: &mut impl Write,
    outcome: &ShoppingListOutcome,
    stores: &[Store],
    currency: CurrencyCode,
) -> io::Result<()> {
    let plan = match outcome {
        ShoppingListOutcome::NoItems { message } => return writeln!(out, "{message}"),
        ShoppingListOutcome::Planned(plan) => plan,
    };

    let store_name = |id: StoreId| {
        stores
            .iter()
            .find(|s| s.id == id)
            .map_or_else(|| format!("Store {id}"), |s| s.name.clone())
    };

    for entry in &plan.plan {
        writeln!(
            out,
            "{} (#{}): {}",
            store_name(entry.store_id),
            entry.store_id,
            money(entry.subtotal, currency)
        )?;
        for (item, price) in &entry.items {
            writeln!(out, "  - {item}: {}", money(*price, currency))?;
        }
    }

    if !plan.not_found.is_empty() {
        writeln!(out, "Not found: {}", plan.not_found.join(", "))?;
    }
    let coverage = if plan.covered_all {
        "all items covered"
    } else {
        "partial coverage"
    };
    writeln!(out, "Total: {} ({coverage})", money(plan.total_cost, currency))
}

pub fn restock(
    out: &mut impl Write,
    report: &RestockReport,
    currency: CurrencyCode,
) -> io::Result<()> {
    writeln!(out, "{}", report.message)?;
    writeln!(
        out,
        "  qty now {} at {}",
        report.quantity,
        optional_money(report.price, currency)
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use findmystore_server::catalog;
    use findmystore_server::services::optimizer::{PlanEntry, ShoppingPlan};

    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).expect("write to Vec cannot fail");
        String::from_utf8(buf).expect("output is UTF-8")
    }

    #[test]
    fn test_stores_lists_each_store_with_link() {
        let stores_list = catalog::fallback_stores();
        let text = render(|out| stores(out, &stores_list));

        assert!(text.starts_with("4 store(s):"));
        assert!(text.contains("SmartMart Jubilee Hills (grocery)"));
        assert!(text.contains("[verified]"));
        assert!(text.contains("https://www.google.com/maps?q=17.433%2C78.403"));
    }

    #[test]
    fn test_stores_empty() {
        let text = render(|out| stores(out, &[]));
        assert_eq!(text, "No stores found.\n");
    }

    #[test]
    fn test_stock_without_price() {
        let info = StockInfo {
            store_id: StoreId::new(9),
            product: "Bread".to_string(),
            quantity: 0,
            price: None,
        };
        let text = render(|out| stock(out, &info, CurrencyCode::INR));
        assert_eq!(text, "Store 9: 'Bread' qty 0 at —\n");
    }

    #[test]
    fn test_cheapest_not_found() {
        let text = render(|out| cheapest(out, "Caviar", None, CurrencyCode::INR));
        assert_eq!(text, "No available 'Caviar' found within criteria.\n");
    }

    #[test]
    fn test_shopping_plan_names_stores_and_totals() {
        let mut items = BTreeMap::new();
        items.insert("Milk Lotion".to_string(), Decimal::new(189, 0));
        let outcome = ShoppingListOutcome::Planned(ShoppingPlan {
            covered_all: false,
            plan: vec![PlanEntry {
                store_id: StoreId::new(2),
                items,
                subtotal: Decimal::new(189, 0),
            }],
            not_found: vec!["Caviar".to_string()],
            total_cost: Decimal::new(189, 0),
        });

        let text = render(|out| {
            shopping_plan(out, &outcome, &catalog::fallback_stores(), CurrencyCode::INR)
        });

        assert!(text.contains("MediCare Pharmacy Banjara (#2): ₹189"));
        assert!(text.contains("  - Milk Lotion: ₹189"));
        assert!(text.contains("Not found: Caviar"));
        assert!(text.ends_with("Total: ₹189 (partial coverage)\n"));
    }

    #[test]
    fn test_shopping_plan_no_items() {
        let outcome = ShoppingListOutcome::NoItems {
            message: "No items in shopping list.".to_string(),
        };
        let text = render(|out| shopping_plan(out, &outcome, &[], CurrencyCode::INR));
        assert_eq!(text, "No items in shopping list.\n");
    }
}
