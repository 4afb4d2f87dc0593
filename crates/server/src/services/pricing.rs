//! Cheapest-store search and per-store price comparison.

use std::cmp::Ordering;

use findmystore_core::{Category, Store, StoreId};
use rust_decimal::Decimal;
use serde::Serialize;

use super::inventory::{Inventory, StockInfo};
use crate::maps;

/// The cheapest available offer for a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheapestOffer {
    #[serde(flatten)]
    pub stock: StockInfo,
    pub store: Store,
}

impl CheapestOffer {
    /// Offer price. Offers are only built from priced stock.
    #[must_use]
    pub fn price(&self) -> Decimal {
        self.stock.price.unwrap_or_default()
    }
}

/// Message returned when no store can sell a product.
#[must_use]
pub fn not_found_message(product: &str) -> String {
    format!("No available '{product}' found within criteria.")
}

/// Find the lowest-priced store that has `product` in stock.
///
/// Prices above `max_price` are ignored. Ties go to the earlier store.
pub fn find_cheapest(
    stores: &[Store],
    inventory: &mut Inventory,
    product: &str,
    max_price: Option<Decimal>,
) -> Option<CheapestOffer> {
    let mut best: Option<(Decimal, &Store, StockInfo)> = None;

    for store in stores {
        let info = inventory.check_stock(store.id, product);
        let Some(price) = info.available_price() else {
            continue;
        };
        if max_price.is_some_and(|max| price > max) {
            continue;
        }
        if best.as_ref().is_none_or(|(best_price, ..)| price < *best_price) {
            best = Some((price, store, info));
        }
    }

    best.map(|(_, store, stock)| CheapestOffer {
        stock,
        store: store.clone(),
    })
}

/// One store's line in a price comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub store_id: StoreId,
    pub store: String,
    pub city: String,
    pub category: Category,
    pub verified: bool,
    pub rating: f64,
    pub qty: u32,
    pub price: Option<Decimal>,
    pub map: String,
}

impl ComparisonRow {
    const fn in_stock(&self) -> bool {
        self.qty > 0 && self.price.is_some()
    }
}

/// Stock and price of one product across every store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceComparison {
    pub product: String,
    pub rows: Vec<ComparisonRow>,
}

impl PriceComparison {
    /// Lowest-priced row with stock.
    #[must_use]
    pub fn cheapest(&self) -> Option<&ComparisonRow> {
        self.rows
            .iter()
            .filter(|r| r.in_stock())
            .min_by(|a, b| a.price.cmp(&b.price))
    }
}

/// Compare `product` across `stores`.
///
/// Rows are sorted by quantity (highest first), then price (lowest first,
/// unpriced last).
pub fn compare_prices(
    stores: &[Store],
    inventory: &mut Inventory,
    product: &str,
) -> PriceComparison {
    let mut rows: Vec<ComparisonRow> = stores
        .iter()
        .map(|store| {
            let info = inventory.check_stock(store.id, product);
            ComparisonRow {
                store_id: store.id,
                store: store.name.clone(),
                city: store.city.clone(),
                category: store.category,
                verified: store.verified,
                rating: store.rating,
                qty: info.quantity,
                price: info.price,
                map: maps::place_link(store),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.qty.cmp(&a.qty).then_with(|| cmp_price(a.price, b.price)));

    PriceComparison {
        product: product.to_string(),
        rows,
    }
}

fn cmp_price(a: Option<Decimal>, b: Option<Decimal>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use findmystore_core::GeoPoint;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::catalog;
    use crate::services::inventory::{InventoryEntry, InventoryTable};

    fn store(id: i32, name: &str) -> Store {
        Store {
            id: StoreId::new(id),
            place_id: None,
            name: name.to_string(),
            city: "Hyderabad".to_string(),
            category: Category::Grocery,
            location: GeoPoint::new(17.4, 78.4),
            rating: 4.4,
            verified: true,
            hours: "9am-9pm".to_string(),
            address: String::new(),
        }
    }

    fn inventory(entries: &[(i32, &str, u32, Option<i64>)]) -> Inventory {
        let mut seed: HashMap<StoreId, InventoryTable> = HashMap::new();
        for &(id, product, quantity, price) in entries {
            seed.entry(StoreId::new(id)).or_default().insert(
                product.to_string(),
                InventoryEntry {
                    quantity,
                    price: price.map(Decimal::from),
                },
            );
        }
        Inventory::with_seed(seed, StdRng::seed_from_u64(0))
    }

    #[test]
    fn test_find_cheapest_on_seed_data() {
        let mut inv = Inventory::new(StdRng::seed_from_u64(0));
        let offer = find_cheapest(&catalog::fallback_stores(), &mut inv, "XYZ Shampoo", None)
            .expect("shampoo is stocked");
        assert_eq!(offer.store.id, StoreId::new(1));
        assert_eq!(offer.price(), Decimal::from(150));
        assert_eq!(offer.stock.quantity, 12);
    }

    #[test]
    fn test_find_cheapest_skips_out_of_stock() {
        let stores = vec![store(1, "A"), store(2, "B")];
        let mut inv = inventory(&[(1, "Milk", 0, Some(10)), (2, "Milk", 3, Some(40))]);
        let offer = find_cheapest(&stores, &mut inv, "Milk", None).expect("offer");
        assert_eq!(offer.store.id, StoreId::new(2));
    }

    #[test]
    fn test_find_cheapest_respects_max_price() {
        let stores = vec![store(1, "A")];
        let mut inv = inventory(&[(1, "Milk", 3, Some(40))]);
        assert!(find_cheapest(&stores, &mut inv, "Milk", Some(Decimal::from(39))).is_none());
        assert!(find_cheapest(&stores, &mut inv, "Milk", Some(Decimal::from(40))).is_some());
    }

    #[test]
    fn test_find_cheapest_tie_goes_to_first_store() {
        let stores = vec![store(1, "A"), store(2, "B")];
        let mut inv = inventory(&[(1, "Milk", 1, Some(40)), (2, "Milk", 9, Some(40))]);
        let offer = find_cheapest(&stores, &mut inv, "Milk", None).expect("offer");
        assert_eq!(offer.store.id, StoreId::new(1));
    }

    #[test]
    fn test_offer_serializes_flat() {
        let stores = vec![store(1, "A")];
        let mut inv = inventory(&[(1, "Milk", 2, Some(45))]);
        let offer = find_cheapest(&stores, &mut inv, "Milk", None).expect("offer");
        let json = serde_json::to_value(&offer).expect("serialize");
        assert_eq!(json["qty"], 2);
        assert_eq!(json["product"], "Milk");
        assert_eq!(json["store"]["name"], "A");
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            not_found_message("Unobtainium"),
            "No available 'Unobtainium' found within criteria."
        );
    }

    #[test]
    fn test_compare_sorts_by_quantity_then_price() {
        let stores = vec![store(1, "A"), store(2, "B"), store(3, "C"), store(4, "D")];
        let mut inv = inventory(&[
            (1, "Milk", 5, Some(50)),
            (2, "Milk", 5, Some(30)),
            (3, "Milk", 9, Some(70)),
            (4, "Milk", 0, None),
        ]);

        let comparison = compare_prices(&stores, &mut inv, "Milk");
        let order: Vec<&str> = comparison.rows.iter().map(|r| r.store.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "A", "D"]);

        let cheapest = comparison.cheapest().expect("cheapest row");
        assert_eq!(cheapest.store, "B");
        assert!(comparison.rows[0].map.starts_with("https://www.google.com/maps"));
    }

    #[test]
    fn test_compare_unpriced_rows_sort_last() {
        assert_eq!(cmp_price(None, Some(Decimal::ONE)), Ordering::Greater);
        assert_eq!(cmp_price(Some(Decimal::ONE), None), Ordering::Less);
    }
}
