//! Finder sessions: per-user store set, inventory, alerts and chat transcript.
//!
//! Every operation runs against one [`FinderSession`]. The server keeps
//! sessions in a [`SessionStore`] and serializes calls within a session with
//! an async mutex; the CLI owns a single session directly.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use findmystore_core::{ChatRole, SessionId, Store, StoreId};
use moka::future::Cache;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use super::alerts::{AlertRegistry, DEFAULT_RESTOCK_QUANTITY, RestockReport};
use super::inventory::{Inventory, StockInfo};
use super::optimizer::{self, ShoppingListOutcome};
use super::pricing::{self, CheapestOffer, PriceComparison};
use super::registry::{StoreDirectory, StoreQuery};
use crate::catalog;
use crate::config::FinderConfig;
use crate::maps::{self, MapsError};

/// One message in a session's chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptTurn {
    pub role: ChatRole,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// State of one finder user.
#[derive(Debug)]
pub struct FinderSession {
    id: SessionId,
    stores: Vec<Store>,
    inventory: Inventory,
    alerts: AlertRegistry,
    transcript: Vec<TranscriptTurn>,
}

impl FinderSession {
    /// New session with the built-in seed inventory.
    #[must_use]
    pub fn new(id: SessionId, rng: StdRng) -> Self {
        Self::with_inventory(id, Inventory::new(rng))
    }

    #[must_use]
    pub fn with_inventory(id: SessionId, inventory: Inventory) -> Self {
        Self {
            id,
            stores: Vec::new(),
            inventory,
            alerts: AlertRegistry::new(),
            transcript: Vec::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Result of the most recent fetch (possibly empty).
    #[must_use]
    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    /// Stores that lookups run against: the current set, or the fallback
    /// list while the current set is empty.
    #[must_use]
    pub fn search_space(&self) -> Cow<'_, [Store]> {
        if self.stores.is_empty() {
            Cow::Owned(catalog::fallback_stores())
        } else {
            Cow::Borrowed(&self.stores)
        }
    }

    /// Replace the current store set.
    pub fn replace_stores(&mut self, stores: Vec<Store>) {
        self.stores = stores;
    }

    /// Fetch stores and make them the current set.
    ///
    /// An empty result still replaces the set. On error the set is unchanged.
    ///
    /// # Errors
    ///
    /// Returns error if the Maps lookup fails.
    #[instrument(skip(self, directory), fields(session_id = %self.id))]
    pub async fn fetch_stores(
        &mut self,
        directory: &StoreDirectory,
        query: &StoreQuery,
    ) -> Result<Vec<Store>, MapsError> {
        let stores = directory.fetch(query).await?;
        debug!(count = stores.len(), "Replacing current store set");
        self.replace_stores(stores.clone());
        Ok(stores)
    }

    /// Store with `store_id` in the search space.
    #[must_use]
    pub fn find_store(&self, store_id: StoreId) -> Option<Store> {
        self.search_space().iter().find(|s| s.id == store_id).cloned()
    }

    pub fn check_stock(&mut self, store_id: StoreId, product: &str) -> StockInfo {
        self.inventory.check_stock(store_id, product.trim())
    }

    pub fn find_cheapest(
        &mut self,
        product: &str,
        max_price: Option<Decimal>,
    ) -> Option<CheapestOffer> {
        let (stores, inventory) = self.search_parts();
        pricing::find_cheapest(&stores, inventory, product.trim(), max_price)
    }

    pub fn compare_prices(&mut self, product: &str) -> PriceComparison {
        let (stores, inventory) = self.search_parts();
        pricing::compare_prices(&stores, inventory, product.trim())
    }

    pub fn optimize<S: AsRef<str>>(&mut self, items: &[S]) -> ShoppingListOutcome {
        let (stores, inventory) = self.search_parts();
        optimizer::optimize(&stores, inventory, items)
    }

    /// Driving directions link, or `None` if the store is unknown.
    #[must_use]
    pub fn directions(&self, store_id: StoreId, origin: Option<&str>) -> Option<String> {
        self.find_store(store_id)
            .map(|store| maps::directions_link(&store, origin))
    }

    pub fn subscribe(&mut self, product: &str, city: &str) -> String {
        self.alerts.subscribe(product, city)
    }

    /// Add stock for a product and count the alerts that would fire.
    pub fn simulate_restock(
        &mut self,
        product: &str,
        store_id: StoreId,
        quantity: Option<u32>,
    ) -> RestockReport {
        let product = product.trim();
        let entry = self.inventory.restock(
            store_id,
            product,
            quantity.unwrap_or(DEFAULT_RESTOCK_QUANTITY),
        );
        let notified = self.alerts.count_matching(product);
        info!(session_id = %self.id, %store_id, product, notified, "Simulated restock");

        RestockReport::new(store_id, product, entry.quantity, entry.price, notified)
    }

    #[must_use]
    pub fn transcript(&self) -> &[TranscriptTurn] {
        &self.transcript
    }

    /// Append a user message and the assistant's reply.
    pub fn record_exchange(&mut self, user: &str, assistant: &str) {
        let now = Utc::now();
        self.transcript.push(TranscriptTurn {
            role: ChatRole::User,
            text: user.to_string(),
            created_at: now,
        });
        self.transcript.push(TranscriptTurn {
            role: ChatRole::Assistant,
            text: assistant.to_string(),
            created_at: now,
        });
    }

    fn search_parts(&mut self) -> (Cow<'_, [Store]>, &mut Inventory) {
        let stores = if self.stores.is_empty() {
            Cow::Owned(catalog::fallback_stores())
        } else {
            Cow::Borrowed(self.stores.as_slice())
        };
        (stores, &mut self.inventory)
    }
}

/// A session shared between concurrent requests.
pub type SharedSession = Arc<Mutex<FinderSession>>;

/// In-memory session registry with idle expiry.
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<SessionId, SharedSession>,
    inventory_seed: Option<u64>,
}

impl SessionStore {
    #[must_use]
    pub fn new(idle_ttl: Duration, max_sessions: u64, inventory_seed: Option<u64>) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle_ttl)
            .build();
        Self {
            cache,
            inventory_seed,
        }
    }

    #[must_use]
    pub fn from_config(config: &FinderConfig) -> Self {
        Self::new(config.session_ttl, config.max_sessions, config.inventory_seed)
    }

    /// Build a session that is not registered in the store.
    ///
    /// With an inventory seed configured every session generates the same
    /// inventory.
    #[must_use]
    pub fn new_session(&self, id: SessionId) -> FinderSession {
        let rng = self
            .inventory_seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        FinderSession::new(id, rng)
    }

    /// Create and register a new session.
    pub async fn create(&self) -> (SessionId, SharedSession) {
        let id = SessionId::generate();
        let session = Arc::new(Mutex::new(self.new_session(id)));
        self.cache.insert(id, Arc::clone(&session)).await;
        info!(session_id = %id, "Created session");
        (id, session)
    }

    pub async fn get(&self, id: SessionId) -> Option<SharedSession> {
        self.cache.get(&id).await
    }
}

#[cfg(test)]
mod tests {
    use findmystore_core::Category;

    use super::*;

    fn session() -> FinderSession {
        FinderSession::new(SessionId::generate(), StdRng::seed_from_u64(9))
    }

    #[test]
    fn test_search_space_falls_back_when_empty() {
        let s = session();
        assert!(s.stores().is_empty());
        assert_eq!(s.search_space().len(), 4);
    }

    #[tokio::test]
    async fn test_fetch_replaces_store_set_even_when_empty() {
        let mut s = session();
        let directory = StoreDirectory::offline();

        let pharmacies = s
            .fetch_stores(
                &directory,
                &StoreQuery::new("Hyderabad").with_category(Some(Category::Pharmacy)),
            )
            .await
            .expect("fetch");
        assert_eq!(pharmacies.len(), 1);
        assert_eq!(s.search_space().len(), 1);

        let none = s
            .fetch_stores(&directory, &StoreQuery::new("Chennai"))
            .await
            .expect("fetch");
        assert!(none.is_empty());
        assert!(s.stores().is_empty());
        assert_eq!(s.search_space().len(), 4);
    }

    #[tokio::test]
    async fn test_cheapest_uses_current_store_set() {
        let mut s = session();
        let directory = StoreDirectory::offline();
        s.fetch_stores(
            &directory,
            &StoreQuery::new("Hyderabad").with_category(Some(Category::Pharmacy)),
        )
        .await
        .expect("fetch");

        let offer = s.find_cheapest("XYZ Shampoo", None).expect("offer");
        assert_eq!(offer.store.id, StoreId::new(2));
        assert_eq!(offer.price(), Decimal::from(155));
    }

    #[test]
    fn test_restock_counts_matching_alerts() {
        let mut s = session();
        s.subscribe("Milk Lotion", "Hyderabad");
        s.subscribe("milk lotion", "Hyderabad");

        let report = s.simulate_restock("Milk Lotion", StoreId::new(1), None);
        assert_eq!(report.quantity, 10);
        assert_eq!(report.price, Some(Decimal::from(199)));
        assert_eq!(report.alerts_notified, 2);
        assert_eq!(
            report.message,
            "Restocked 'Milk Lotion' at store 1. Alerts notified: 2 (demo)."
        );
        assert_eq!(s.check_stock(StoreId::new(1), "Milk Lotion").quantity, 10);
    }

    #[test]
    fn test_directions_for_unknown_store() {
        let s = session();
        assert!(s.directions(StoreId::new(99), None).is_none());

        let link = s.directions(StoreId::new(3), Some("Ameerpet")).expect("link");
        assert!(link.contains("destination=17.444%2C78.501"));
        assert!(link.contains("origin=Ameerpet"));
    }

    #[test]
    fn test_record_exchange_appends_pair() {
        let mut s = session();
        s.record_exchange("hi", "hello");
        let roles: Vec<ChatRole> = s.transcript().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant]);
    }

    #[tokio::test]
    async fn test_session_store_round_trip() {
        let store = SessionStore::new(Duration::from_secs(60), 10, Some(1));
        let (id, created) = store.create().await;

        let fetched = store.get(id).await.expect("session exists");
        assert!(Arc::ptr_eq(&created, &fetched));
        assert_eq!(fetched.lock().await.id(), id);

        assert!(store.get(SessionId::generate()).await.is_none());
    }

    #[test]
    fn test_seeded_sessions_generate_same_inventory() {
        let store = SessionStore::new(Duration::from_secs(60), 10, Some(77));
        let mut a = store.new_session(SessionId::generate());
        let mut b = store.new_session(SessionId::generate());
        assert_eq!(
            a.check_stock(StoreId::new(40), "Ghee"),
            b.check_stock(StoreId::new(40), "Ghee")
        );
    }
}
