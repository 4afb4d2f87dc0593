//! Store records.

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::id::StoreId;

/// Placeholder for opening hours the provider did not report.
pub const UNKNOWN_HOURS: &str = "—";

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// A store in the current store set.
///
/// Stores are created fresh on every fetch; `id` is only unique within the
/// fetch that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// Local sequential ID.
    pub id: StoreId,
    /// Map-provider place ID, for live results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    pub name: String,
    pub city: String,
    pub category: Category,
    #[serde(flatten)]
    pub location: GeoPoint,
    /// Rating from 0 to 5.
    pub rating: f64,
    pub verified: bool,
    pub hours: String,
    pub address: String,
}

impl Store {
    /// Rating rounded to whole stars, for display.
    #[must_use]
    pub fn stars(&self) -> usize {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        // Rating is clamped to 0..=5 first
        let stars = self.rating.clamp(0.0, 5.0).round() as usize;
        stars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(rating: f64) -> Store {
        Store {
            id: StoreId::new(1),
            place_id: None,
            name: "SmartMart".to_string(),
            city: "Hyderabad".to_string(),
            category: Category::Grocery,
            location: GeoPoint::new(17.433, 78.403),
            rating,
            verified: true,
            hours: "9am-9pm".to_string(),
            address: String::new(),
        }
    }

    #[test]
    fn test_stars_rounds_rating() {
        assert_eq!(store(4.5).stars(), 5);
        assert_eq!(store(4.1).stars(), 4);
        assert_eq!(store(9.0).stars(), 5);
    }

    #[test]
    fn test_store_serializes_flat_location() {
        let json = serde_json::to_value(store(4.5)).expect("serialize");
        assert_eq!(json["lat"], 17.433);
        assert_eq!(json["lng"], 78.403);
        assert_eq!(json["category"], "grocery");
        assert!(json.get("place_id").is_none());
    }

    #[test]
    fn test_geo_point_display() {
        assert_eq!(GeoPoint::new(17.385, 78.4867).to_string(), "17.385,78.4867");
    }
}
