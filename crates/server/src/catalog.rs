//! Built-in demo data: fallback stores, seed inventory and price ladders.
//!
//! The fallback list is used whenever no Maps key is configured, and as the
//! search space whenever a session's current store set is empty.

use std::collections::HashMap;

use findmystore_core::{Category, GeoPoint, Store, StoreId};
use rust_decimal::Decimal;

use crate::services::inventory::{InventoryEntry, InventoryTable};

/// Center of Hyderabad, used when geocoding yields nothing.
pub const DEFAULT_LOCATION: GeoPoint = GeoPoint::new(17.3850, 78.4867);

/// Prices for lazily generated inventory entries.
pub const GENERATED_PRICE_LADDER: [i64; 12] =
    [79, 99, 129, 149, 179, 199, 249, 299, 349, 399, 899, 999];

/// Prices for products introduced by a simulated restock.
pub const RESTOCK_PRICE_LADDER: [i64; 6] = [99, 129, 149, 199, 249, 299];

/// Upper bound (inclusive) for generated quantities.
pub const MAX_GENERATED_QUANTITY: u32 = 12;

struct FallbackStore {
    id: i32,
    name: &'static str,
    category: Category,
    hours: &'static str,
    lat: f64,
    lng: f64,
    rating: f64,
    verified: bool,
}

const FALLBACK_CITY: &str = "Hyderabad";

const FALLBACK_STORES: [FallbackStore; 4] = [
    FallbackStore {
        id: 1,
        name: "SmartMart Jubilee Hills",
        category: Category::Grocery,
        hours: "9am-9pm",
        lat: 17.433,
        lng: 78.403,
        rating: 4.5,
        verified: true,
    },
    FallbackStore {
        id: 2,
        name: "MediCare Pharmacy Banjara",
        category: Category::Pharmacy,
        hours: "24/7",
        lat: 17.412,
        lng: 78.448,
        rating: 4.3,
        verified: true,
    },
    FallbackStore {
        id: 3,
        name: "ElectroHub Secunderabad",
        category: Category::Electronics,
        hours: "10am-8pm",
        lat: 17.444,
        lng: 78.501,
        rating: 4.1,
        verified: false,
    },
    FallbackStore {
        id: 4,
        name: "StyleStreet Hitech City",
        category: Category::Clothing,
        hours: "11am-9pm",
        lat: 17.452,
        lng: 78.381,
        rating: 4.6,
        verified: true,
    },
];

/// (store, product, quantity, price)
const SEED_INVENTORY: [(i32, &str, u32, i64); 8] = [
    (1, "XYZ Shampoo", 12, 150),
    (1, "Milk Lotion", 0, 199),
    (1, "Rice 10kg", 8, 489),
    (2, "XYZ Shampoo", 4, 155),
    (2, "Milk Lotion", 7, 189),
    (3, "Laptop Bag", 6, 899),
    (3, "USB Cable", 15, 149),
    (4, "T-Shirt", 10, 399),
];

/// The fixed fallback store list, in display order.
#[must_use]
pub fn fallback_stores() -> Vec<Store> {
    FALLBACK_STORES
        .iter()
        .map(|s| Store {
            id: StoreId::new(s.id),
            place_id: None,
            name: s.name.to_string(),
            city: FALLBACK_CITY.to_string(),
            category: s.category,
            location: GeoPoint::new(s.lat, s.lng),
            rating: s.rating,
            verified: s.verified,
            hours: s.hours.to_string(),
            address: String::new(),
        })
        .collect()
}

/// The authoritative seed inventory, keyed by store.
#[must_use]
pub fn seed_inventory() -> HashMap<StoreId, InventoryTable> {
    let mut tables: HashMap<StoreId, InventoryTable> = HashMap::new();
    for (store_id, product, quantity, price) in SEED_INVENTORY {
        tables.entry(StoreId::new(store_id)).or_default().insert(
            product.to_string(),
            InventoryEntry {
                quantity,
                price: Some(Decimal::from(price)),
            },
        );
    }
    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_stores_have_sequential_ids() {
        let stores = fallback_stores();
        let ids: Vec<i32> = stores.iter().map(|s| s.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(stores.iter().all(|s| s.city == "Hyderabad"));
    }

    #[test]
    fn test_seed_inventory_contents() {
        let seed = seed_inventory();
        assert_eq!(seed.len(), 4);

        let smartmart = &seed[&StoreId::new(1)];
        assert_eq!(smartmart["Rice 10kg"].quantity, 8);
        assert_eq!(smartmart["Rice 10kg"].price, Some(Decimal::from(489)));
        assert_eq!(smartmart["Milk Lotion"].quantity, 0);
    }
}
