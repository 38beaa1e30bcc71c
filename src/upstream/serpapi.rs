//! Flight and image search provider.

use reqwest::Client;
use serde_json::Value;

use crate::config::SerpApiConfig;
use crate::upstream::client::send_json;
use crate::upstream::UpstreamError;

const PROVIDER: &str = "serpapi";

/// Locale parameters pinned for every flight search; callers cannot override them.
const FLIGHT_FIXED: [(&str, &str); 3] = [("hl", "en"), ("gl", "us"), ("currency", "USD")];

/// Client for the search provider's JSON endpoint.
#[derive(Clone)]
pub struct SerpApiClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl SerpApiClient {
    pub fn new(http: Client, config: &SerpApiConfig) -> Self {
        Self {
            http,
            endpoint: format!("{}/search.json", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        }
    }

    /// Run a flight search with the caller's parameters.
    ///
    /// `engine`, airports, dates and the departure/booking tokens pass through
    /// unchanged; the key and locale parameters are always the relay's own.
    pub async fn search_flights(&self, params: &[(String, String)]) -> Result<Value, UpstreamError> {
        let mut query: Vec<(&str, &str)> = params
            .iter()
            .filter(|(key, _)| !is_reserved(key))
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        query.extend(FLIGHT_FIXED);
        query.push(("api_key", self.api_key.as_str()));

        self.search(&query).await
    }

    /// Search images for `q`.
    pub async fn search_images(&self, q: &str) -> Result<Value, UpstreamError> {
        let query = [
            ("engine", "google_images"),
            ("q", q),
            ("google_domain", "google.com"),
            ("hl", "en"),
            ("gl", "us"),
            ("device", "desktop"),
            ("api_key", self.api_key.as_str()),
        ];

        self.search(&query).await
    }

    async fn search(&self, query: &[(&str, &str)]) -> Result<Value, UpstreamError> {
        if self.api_key.is_empty() {
            return Err(UpstreamError::NotConfigured("SERPAPI_API_KEY"));
        }
        send_json(PROVIDER, self.http.get(&self.endpoint).query(query)).await
    }
}

fn is_reserved(key: &str) -> bool {
    key == "api_key" || FLIGHT_FIXED.iter().any(|(fixed, _)| *fixed == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_keys() {
        assert!(is_reserved("api_key"));
        assert!(is_reserved("currency"));
        assert!(is_reserved("hl"));
        assert!(!is_reserved("engine"));
        assert!(!is_reserved("departure_token"));
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let config = SerpApiConfig {
            api_key: "k".into(),
            base_url: "http://127.0.0.1:9000/".into(),
        };
        let client = SerpApiClient::new(Client::new(), &config);
        assert_eq!(client.endpoint, "http://127.0.0.1:9000/search.json");
    }
}
