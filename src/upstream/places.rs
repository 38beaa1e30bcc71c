//! Places provider: autocomplete, details and nearby airport search.

use reqwest::Client;
use serde_json::Value;

use crate::config::GoogleMapsConfig;
use crate::upstream::client::send_json;
use crate::upstream::UpstreamError;

const PROVIDER: &str = "google_places";

/// Radius in meters used when the caller does not send one.
pub const DEFAULT_NEARBY_RADIUS: &str = "50000";

/// Nearby search only ever looks for airports.
pub const NEARBY_TYPE: &str = "airport";

#[derive(Clone)]
pub struct PlacesClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl PlacesClient {
    pub fn new(http: Client, config: &GoogleMapsConfig) -> Self {
        Self {
            http,
            base_url: format!("{}/maps/api/place", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        }
    }

    /// Airport suggestions for text typed into an input field.
    pub async fn autocomplete(&self, input: &str, types: Option<&str>) -> Result<Value, UpstreamError> {
        self.get("autocomplete", &[("input", Some(input)), ("types", types)])
            .await
    }

    /// Details (coordinates, city) for a place id.
    pub async fn details(&self, place_id: &str, place_type: Option<&str>) -> Result<Value, UpstreamError> {
        self.get("details", &[("type", place_type), ("place_id", Some(place_id))])
            .await
    }

    /// Airports around `location` ("lat,lng").
    pub async fn nearby_airports(&self, location: &str, radius: Option<&str>) -> Result<Value, UpstreamError> {
        let radius = radius.unwrap_or(DEFAULT_NEARBY_RADIUS);
        self.get(
            "nearbysearch",
            &[("location", Some(location)), ("radius", Some(radius)), ("type", Some(NEARBY_TYPE))],
        )
        .await
    }

    async fn get(&self, endpoint: &str, params: &[(&str, Option<&str>)]) -> Result<Value, UpstreamError> {
        if self.api_key.is_empty() {
            return Err(UpstreamError::NotConfigured("GOOGLE_MAPS_API_KEY"));
        }

        // Absent optional values are left out of the query string entirely.
        let mut query: Vec<(&str, &str)> = params
            .iter()
            .filter_map(|(key, value)| value.map(|v| (*key, v)))
            .collect();
        query.push(("key", self.api_key.as_str()));

        let url = format!("{}/{}/json", self.base_url, endpoint);
        send_json(PROVIDER, self.http.get(url).query(&query)).await
    }
}
