//! Restock alert subscriptions (demo: nothing is actually sent).

use findmystore_core::StoreId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Quantity added by a restock when none is given.
pub const DEFAULT_RESTOCK_QUANTITY: u32 = 10;

/// Interest in a product within a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub product: String,
    pub city: String,
}

/// Append-only list of subscriptions. Duplicates are kept.
#[derive(Debug, Clone, Default)]
pub struct AlertRegistry {
    subscriptions: Vec<Subscription>,
}

impl AlertRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a subscription and return the confirmation message.
    pub fn subscribe(&mut self, product: &str, city: &str) -> String {
        let subscription = Subscription {
            product: product.trim().to_string(),
            city: city.trim().to_string(),
        };
        let message = format!(
            "Subscribed to '{}' alerts in {} (demo).",
            subscription.product, subscription.city
        );
        self.subscriptions.push(subscription);
        message
    }

    /// Number of subscriptions for `product`, ignoring case.
    ///
    /// The city is not considered.
    #[must_use]
    pub fn count_matching(&self, product: &str) -> usize {
        let product = product.trim().to_lowercase();
        self.subscriptions
            .iter()
            .filter(|s| s.product.to_lowercase() == product)
            .count()
    }

    #[must_use]
    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }
}

/// Outcome of a simulated restock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestockReport {
    pub store_id: StoreId,
    pub product: String,
    #[serde(rename = "qty")]
    pub quantity: u32,
    pub price: Option<Decimal>,
    pub alerts_notified: usize,
    pub message: String,
}

impl RestockReport {
    #[must_use]
    pub fn new(
        store_id: StoreId,
        product: &str,
        quantity: u32,
        price: Option<Decimal>,
        alerts_notified: usize,
    ) -> Self {
        Self {
            store_id,
            product: product.to_string(),
            quantity,
            price,
            alerts_notified,
            message: format!(
                "Restocked '{product}' at store {store_id}. Alerts notified: {alerts_notified} (demo)."
            ),
        }
    }
}
