//! Google Maps URLs for viewing a store and getting directions.

use findmystore_core::Store;
use url::form_urlencoded;

const SEARCH_URL: &str = "https://www.google.com/maps/search/";
const COORDINATE_URL: &str = "https://www.google.com/maps";
const DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/";

/// Link that opens the store on Google Maps.
///
/// Uses the place ID when known, otherwise the coordinates.
#[must_use]
pub fn place_link(store: &Store) -> String {
    if let Some(place_id) = &store.place_id {
        with_query(
            SEARCH_URL,
            &[("api", "1"), ("query", "Google"), ("query_place_id", place_id.as_str())],
        )
    } else {
        with_query(COORDINATE_URL, &[("q", store.location.to_string().as_str())])
    }
}

/// Driving directions to the store, optionally from `origin`.
#[must_use]
pub fn directions_link(store: &Store, origin: Option<&str>) -> String {
    let destination = store.location.to_string();
    let mut params: Vec<(&str, &str)> = vec![("api", "1"), ("destination", destination.as_str())];
    if let Some(place_id) = &store.place_id {
        params.push(("destination_place_id", place_id.as_str()));
    }
    if let Some(origin) = origin.map(str::trim).filter(|o| !o.is_empty()) {
        params.push(("origin", origin));
    }
    params.push(("travelmode", "driving"));

    with_query(DIRECTIONS_URL, &params)
}

fn with_query(base: &str, params: &[(&str, &str)]) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("{base}?{query}")
}
