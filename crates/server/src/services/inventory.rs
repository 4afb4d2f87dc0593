//! Two-tier inventory: authoritative seed data plus lazily generated entries.
//!
//! The first lookup of a (store, product) pair that neither tier knows about
//! generates a random quantity and price and stores it in the dynamic tier.
//! Every later lookup returns that same entry.

use std::collections::HashMap;

use findmystore_core::StoreId;
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{self, GENERATED_PRICE_LADDER, MAX_GENERATED_QUANTITY, RESTOCK_PRICE_LADDER};

/// Product name to stock entry for a single store.
pub type InventoryTable = HashMap<String, InventoryEntry>;

/// Stock of one product at one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub quantity: u32,
    pub price: Option<Decimal>,
}

/// Result of a stock lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    pub store_id: StoreId,
    pub product: String,
    #[serde(rename = "qty")]
    pub quantity: u32,
    pub price: Option<Decimal>,
}

impl StockInfo {
    /// Price, if the product can be bought here right now.
    #[must_use]
    pub const fn available_price(&self) -> Option<Decimal> {
        if self.quantity > 0 { self.price } else { None }
    }
}

/// Inventory tables for one session.
#[derive(Debug)]
pub struct Inventory {
    seed: HashMap<StoreId, InventoryTable>,
    dynamic: HashMap<StoreId, InventoryTable>,
    rng: StdRng,
}

impl Inventory {
    /// Inventory backed by the built-in seed data.
    #[must_use]
    pub fn new(rng: StdRng) -> Self {
        Self::with_seed(catalog::seed_inventory(), rng)
    }

    /// Inventory backed by custom seed tables.
    #[must_use]
    pub fn with_seed(seed: HashMap<StoreId, InventoryTable>, rng: StdRng) -> Self {
        Self {
            seed,
            dynamic: HashMap::new(),
            rng,
        }
    }

    /// Look up a product at a store, generating an entry on first sight.
    pub fn check_stock(&mut self, store_id: StoreId, product: &str) -> StockInfo {
        let entry = self.entry(store_id, product);
        StockInfo {
            store_id,
            product: product.to_string(),
            quantity: entry.quantity,
            price: entry.price,
        }
    }

    /// Add `quantity` units of a product to a store.
    ///
    /// An existing entry is found the same way [`Self::check_stock`] finds it,
    /// seed tier first, and keeps its price. A product neither tier knows is
    /// created with a price drawn from the restock ladder, in the seed tier for
    /// stores with seed data and in the dynamic tier otherwise. Returns the
    /// updated entry.
    pub fn restock(&mut self, store_id: StoreId, product: &str, quantity: u32) -> InventoryEntry {
        let existing = match self.seed.get_mut(&store_id).and_then(|t| t.get_mut(product)) {
            Some(entry) => Some(entry),
            None => self.dynamic.get_mut(&store_id).and_then(|t| t.get_mut(product)),
        };
        if let Some(entry) = existing {
            entry.quantity = entry.quantity.saturating_add(quantity);
            return *entry;
        }

        let entry = InventoryEntry {
            quantity,
            price: pick_price(&mut self.rng, &RESTOCK_PRICE_LADDER),
        };
        let table = if self.seed.contains_key(&store_id) {
            self.seed.entry(store_id).or_default()
        } else {
            self.dynamic.entry(store_id).or_default()
        };
        table.insert(product.to_string(), entry);
        entry
    }

    fn entry(&mut self, store_id: StoreId, product: &str) -> InventoryEntry {
        if let Some(entry) = self.seed.get(&store_id).and_then(|t| t.get(product)) {
            return *entry;
        }

        let table = self.dynamic.entry(store_id).or_default();
        if let Some(entry) = table.get(product) {
            return *entry;
        }

        let entry = InventoryEntry {
            quantity: self.rng.random_range(0..=MAX_GENERATED_QUANTITY),
            price: pick_price(&mut self.rng, &GENERATED_PRICE_LADDER),
        };
        debug!(%store_id, product, quantity = entry.quantity, "Generated inventory entry");
        table.insert(product.to_string(), entry);
        entry
    }
}

fn pick_price(rng: &mut StdRng, ladder: &[i64]) -> Option<Decimal> {
    ladder.choose(rng).copied().map(Decimal::from)
}
