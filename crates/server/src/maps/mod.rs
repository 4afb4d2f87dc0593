//! Google Maps integration: geocoding, nearby search and map links.
//!
//! The client is only constructed when `MAPS_API_KEY` is configured. Store
//! records are synthesized from Places results by [`synthesize_stores`],
//! which is kept free of I/O so the derivation rules can be tested directly.

pub mod links;

use std::sync::Arc;

use findmystore_core::{Category, GeoPoint, Store, StoreId, UNKNOWN_HOURS};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::catalog::DEFAULT_LOCATION;
use crate::config::MapsConfig;

pub use links::{directions_link, place_link};

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const NEARBY_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

/// Rating assumed when a place has none.
const DEFAULT_RATING: f64 = 4.2;
/// Rating count assumed when a place reports none.
const DEFAULT_RATINGS_TOTAL: u32 = 20;
/// Minimum rating for the verified badge.
const VERIFIED_MIN_RATING: f64 = 4.3;
/// Minimum number of ratings for the verified badge.
const VERIFIED_MIN_RATINGS_TOTAL: u32 = 30;

/// Errors that can occur when calling the Google Maps APIs.
#[derive(Debug, Error)]
pub enum MapsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-OK status.
    #[error("API error ({status}): {message}")]
    Api { status: String, message: String },

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Google Maps API client.
#[derive(Clone)]
pub struct MapsClient {
    inner: Arc<MapsClientInner>,
}

struct MapsClientInner {
    client: reqwest::Client,
    api_key: SecretString,
}

impl MapsClient {
    /// Create a new Maps client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &MapsConfig) -> Result<Self, MapsError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            inner: Arc::new(MapsClientInner {
                client,
                api_key: config.api_key.clone(),
            }),
        })
    }

    /// Geocode a city name.
    ///
    /// Returns `None` when the geocoder has no result for the name.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports an error.
    #[instrument(skip(self))]
    pub async fn geocode(&self, city: &str) -> Result<Option<GeoPoint>, MapsError> {
        let response: GeocodeResponse = self
            .get(GEOCODE_URL, &[("address", city.to_string())])
            .await?;
        check_status(&response.status, response.error_message.as_deref())?;

        Ok(response
            .results
            .into_iter()
            .next()
            .map(|r| GeoPoint::new(r.geometry.location.lat, r.geometry.location.lng)))
    }

    /// Search for places near a location.
    ///
    /// `open_now` is only sent together with a place type.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports an error.
    #[instrument(skip(self))]
    pub async fn places_nearby(
        &self,
        location: GeoPoint,
        radius_m: u32,
        place_type: Option<&str>,
        open_now: bool,
    ) -> Result<Vec<PlaceResult>, MapsError> {
        let mut params = vec![
            ("location", location.to_string()),
            ("radius", radius_m.to_string()),
        ];
        if let Some(place_type) = place_type {
            params.push(("type", place_type.to_string()));
            if open_now {
                params.push(("opennow", "true".to_string()));
            }
        }

        let response: NearbySearchResponse = self.get(NEARBY_SEARCH_URL, &params).await?;
        check_status(&response.status, response.error_message.as_deref())?;

        debug!(results = response.results.len(), "Nearby search complete");
        Ok(response.results)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, MapsError> {
        let response = self
            .inner
            .client
            .get(url)
            .query(params)
            .query(&[("key", self.inner.api_key.expose_secret())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MapsError::Api {
                status: status.as_u16().to_string(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MapsError::Parse(e.to_string()))
    }
}

/// Treat `OK` and `ZERO_RESULTS` as success.
fn check_status(status: &str, message: Option<&str>) -> Result<(), MapsError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => Err(MapsError::Api {
            status: other.to_string(),
            message: message.unwrap_or("no error message").to_string(),
        }),
    }
}

/// Build store records from nearby-search results.
///
/// IDs are assigned sequentially from 1 in result order. Places without a
/// location are pinned to `center`.
#[must_use]
pub fn synthesize_stores(
    city: &str,
    category: Option<Category>,
    center: GeoPoint,
    places: Vec<PlaceResult>,
) -> Vec<Store> {
    places
        .into_iter()
        .zip(1..)
        .map(|(place, id)| {
            let rating = place.rating.unwrap_or(DEFAULT_RATING);
            let ratings_total = place.user_ratings_total.unwrap_or(DEFAULT_RATINGS_TOTAL);
            let location = place
                .geometry
                .map_or(center, |g| GeoPoint::new(g.location.lat, g.location.lng));

            Store {
                id: StoreId::new(id),
                place_id: place.place_id,
                name: place.name.unwrap_or_default(),
                city: city.to_string(),
                category: category.unwrap_or(Category::General),
                location,
                rating,
                verified: is_verified(rating, ratings_total),
                hours: UNKNOWN_HOURS.to_string(),
                address: place.vicinity.unwrap_or_default(),
            }
        })
        .collect()
}

/// Verified badge rule for live results.
#[must_use]
pub fn is_verified(rating: f64, ratings_total: u32) -> bool {
    rating >= VERIFIED_MIN_RATING && ratings_total >= VERIFIED_MIN_RATINGS_TOTAL
}

/// Location used when geocoding finds nothing.
#[must_use]
pub const fn default_location() -> GeoPoint {
    DEFAULT_LOCATION
}

// =============================================================================
// Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

/// A single nearby-search result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceResult {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub vicinity: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub geometry: Option<Geometry>,
}

/// Place geometry.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

/// Latitude/longitude as returned by the Maps APIs.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}
