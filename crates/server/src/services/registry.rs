//! Store lookup against Google Maps, or the fallback list when offline.

use findmystore_core::{Category, Store};
use tracing::{info, instrument};

use crate::catalog;
use crate::maps::{self, MapsClient, MapsError};

/// City used when a caller does not name one.
pub const DEFAULT_CITY: &str = "Hyderabad";

/// Search radius used when a caller does not give one.
pub const DEFAULT_RADIUS_KM: f64 = 6.0;

/// Parameters of a store fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreQuery {
    pub city: String,
    pub category: Option<Category>,
    pub radius_km: f64,
    pub open_now: bool,
}

impl StoreQuery {
    /// Query for `city` with default radius and no filters.
    #[must_use]
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            category: None,
            radius_km: DEFAULT_RADIUS_KM,
            open_now: false,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    #[must_use]
    pub fn with_open_now(mut self, open_now: bool) -> Self {
        self.open_now = open_now;
        self
    }

    /// Search radius in whole metres, truncated.
    #[must_use]
    pub fn radius_m(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let metres = (self.radius_km.max(0.0) * 1000.0).trunc() as u32;
        metres
    }
}

impl Default for StoreQuery {
    fn default() -> Self {
        Self::new(DEFAULT_CITY)
    }
}

/// Source of store records.
#[derive(Clone, Default)]
pub struct StoreDirectory {
    maps: Option<MapsClient>,
}

impl StoreDirectory {
    #[must_use]
    pub const fn new(maps: Option<MapsClient>) -> Self {
        Self { maps }
    }

    /// Directory that only serves the fallback list.
    #[must_use]
    pub const fn offline() -> Self {
        Self { maps: None }
    }

    /// Whether live Maps lookups are enabled.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.maps.is_some()
    }

    /// Fetch stores matching `query`.
    ///
    /// # Errors
    ///
    /// Returns error if a Maps request fails.
    #[instrument(skip(self), fields(live = self.is_live()))]
    pub async fn fetch(&self, query: &StoreQuery) -> Result<Vec<Store>, MapsError> {
        let Some(client) = &self.maps else {
            return Ok(filter_fallback(&query.city, query.category));
        };

        let center = client
            .geocode(&query.city)
            .await?
            .unwrap_or_else(maps::default_location);
        let places = client
            .places_nearby(
                center,
                query.radius_m(),
                query.category.and_then(|c| c.place_type()),
                query.open_now,
            )
            .await?;

        let stores = maps::synthesize_stores(&query.city, query.category, center, places);
        info!(city = %query.city, count = stores.len(), "Fetched live stores");
        Ok(stores)
    }
}

/// Fallback stores in `city` (case-insensitive), optionally of one category.
#[must_use]
pub fn filter_fallback(city: &str, category: Option<Category>) -> Vec<Store> {
    let city = city.trim();
    catalog::fallback_stores()
        .into_iter()
        .filter(|s| s.city.eq_ignore_ascii_case(city))
        .filter(|s| category.is_none_or(|c| s.category == c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_fallback_city_is_case_insensitive() {
        assert_eq!(filter_fallback("hyderabad", None).len(), 4);
        assert_eq!(filter_fallback("HYDERABAD", None).len(), 4);
        assert!(filter_fallback("Mumbai", None).is_empty());
    }

    #[test]
    fn test_filter_fallback_by_category() {
        let stores = filter_fallback("Hyderabad", Some(Category::Pharmacy));
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].name, "MediCare Pharmacy Banjara");

        assert!(filter_fallback("Hyderabad", Some(Category::Bakery)).is_empty());
    }

    #[test]
    fn test_radius_conversion() {
        assert_eq!(StoreQuery::default().radius_m(), 6000);
        assert_eq!(StoreQuery::new("Pune").with_radius_km(2.5).radius_m(), 2500);
        assert_eq!(StoreQuery::new("Pune").with_radius_km(-1.0).radius_m(), 0);
        assert_eq!(StoreQuery::new("Pune").with_radius_km(0.0015).radius_m(), 1);
        assert_eq!(StoreQuery::new("Pune").with_radius_km(2.9999).radius_m(), 2999);
    }

    #[tokio::test]
    async fn test_offline_fetch_uses_fallback() {
        let directory = StoreDirectory::offline();
        let query = StoreQuery::new("Hyderabad").with_category(Some(Category::Grocery));
        let stores = directory.fetch(&query).await.expect("offline fetch");
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].name, "SmartMart Jubilee Hills");
    }
}
