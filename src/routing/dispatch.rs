//! Validation and provider dispatch for a matched route.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::http::request::QueryParams;
use crate::http::response::RelayError;
use crate::routing::table::{Route, Target};
use crate::upstream::{decode_image_payload, StoredObject, UpstreamError, Upstreams};

/// Parameters extracted from the request according to the route's `Input`.
#[derive(Debug, Clone)]
pub enum RouteInput {
    Query(QueryParams),
    Json(Map<String, Value>),
}

impl RouteInput {
    /// Parse a JSON request body; anything but an object is rejected.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body).map(RouteInput::Json)
    }

    /// Present and non-empty, the same test the browser client relies on.
    fn has(&self, key: &str) -> bool {
        match self {
            RouteInput::Query(query) => query.get_non_empty(key).is_some(),
            RouteInput::Json(body) => match body.get(key) {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateImageBody {
    #[serde(default)]
    title: Value,
}

impl GenerateImageBody {
    /// The title as it is spliced into the prompt; a missing title is sent as empty.
    fn title_text(&self) -> String {
        match &self.title {
            Value::Null => String::new(),
            Value::String(title) => title.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadImageBody {
    image_binary: String,
    file_name: String,
}

impl Route {
    /// Reject the request if a required key is missing. No provider call is made.
    pub fn validate(&self, input: &RouteInput) -> Result<(), RelayError> {
        let missing = self.required.iter().find(|key| !input.has(key));
        match (missing, self.missing_message) {
            (None, _) => Ok(()),
            (Some(_), Some(message)) => Err(RelayError::MissingInput(message)),
            (Some(key), None) => Err(RelayError::MissingParameter(*key)),
        }
    }

    /// Issue the route's single provider call.
    pub async fn invoke(&self, upstreams: &Upstreams, input: RouteInput) -> Result<Value, UpstreamError> {
        match (self.target, input) {
            (Target::FlightSearch, RouteInput::Query(query)) => {
                upstreams.serpapi.search_flights(&query.pairs()).await
            }
            (Target::ImageSearch, RouteInput::Query(query)) => {
                upstreams.serpapi.search_images(required(&query, "query")).await
            }
            (Target::PlacesAutocomplete, RouteInput::Query(query)) => {
                upstreams
                    .places
                    .autocomplete(required(&query, "input"), query.get("types"))
                    .await
            }
            (Target::PlacesDetails, RouteInput::Query(query)) => {
                upstreams
                    .places
                    .details(required(&query, "place_id"), query.get("type"))
                    .await
            }
            (Target::PlacesNearby, RouteInput::Query(query)) => {
                upstreams
                    .places
                    .nearby_airports(required(&query, "location"), query.get_non_empty("radius"))
                    .await
            }
            (Target::GenerateImage, RouteInput::Json(body)) => {
                let body: GenerateImageBody = from_body(body)?;
                let image = upstreams.images.generate_logo(&body.title_text()).await?;
                Ok(json!({ "base64Image": image }))
            }
            (Target::UploadImage, RouteInput::Json(body)) => {
                let body: UploadImageBody = from_body(body)?;
                let store = upstreams.object_store()?;
                let image = decode_image_payload(&body.image_binary)
                    .map_err(|e| UpstreamError::Payload(e.to_string()))?;

                let url = store
                    .put(StoredObject {
                        key: body.file_name,
                        bytes: image.bytes,
                        content_type: image.content_type,
                    })
                    .await?;
                Ok(json!({ "url": url }))
            }
            (target, _) => Err(UpstreamError::Payload(format!(
                "route {} received input of the wrong kind for {target:?}",
                self.name
            ))),
        }
    }

    /// Shape a provider failure for the caller.
    pub fn upstream_failure(&self, err: UpstreamError) -> RelayError {
        match self.target.failure_message() {
            Some(message) => RelayError::failed(message, err),
            None => RelayError::Upstream(err),
        }
    }

    /// Shape a failure to read or parse the request itself.
    pub fn input_failure(&self, err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> RelayError {
        RelayError::failed(self.target.failure_message().unwrap_or("Invalid request body"), err)
    }
}

/// Value of a key already checked by `validate`.
fn required<'a>(query: &'a QueryParams, key: &str) -> &'a str {
    query.get(key).unwrap_or_default()
}

fn from_body<T: DeserializeOwned>(body: Map<String, Value>) -> Result<T, UpstreamError> {
    serde_json::from_value(Value::Object(body)).map_err(|e| UpstreamError::Payload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteTable;
    use axum::http::Method;

    fn route(method: Method, path: &str) -> &'static Route {
        RouteTable::new().match_route(&method, path).unwrap()
    }

    #[test]
    fn test_missing_query_parameter() {
        let route = route(Method::GET, "/google-places-autocomplete");
        let input = RouteInput::Query(QueryParams::parse(Some("types=airport")));
        let err = route.validate(&input).unwrap_err();
        assert_eq!(err.to_string(), "Missing 'input' parameter");
    }

    #[test]
    fn test_empty_query_parameter_is_missing() {
        let route = route(Method::GET, "/google-places-details");
        let input = RouteInput::Query(QueryParams::parse(Some("place_id=")));
        assert!(matches!(route.validate(&input), Err(RelayError::MissingParameter("place_id"))));
    }

    #[test]
    fn test_present_query_parameter() {
        let route = route(Method::GET, "/google-places-nearby");
        let input = RouteInput::Query(QueryParams::parse(Some("location=40.6,-73.7")));
        assert!(route.validate(&input).is_ok());
    }

    #[test]
    fn test_json_required_fields() {
        let route = route(Method::POST, "/upload-image");

        let input = RouteInput::from_json(br#"{"imageBinary":"QUJD"}"#).unwrap();
        let err = route.validate(&input).unwrap_err();
        assert!(matches!(err, RelayError::MissingInput(_)));
        assert_eq!(err.to_string(), "Missing imageBinary or fileName");

        let input = RouteInput::from_json(br#"{"imageBinary":null,"fileName":"x.png"}"#).unwrap();
        let err = route.validate(&input).unwrap_err();
        assert_eq!(err.to_string(), "Missing imageBinary or fileName");

        let input = RouteInput::from_json(br#"{"imageBinary":"QUJD","fileName":"x.png"}"#).unwrap();
        assert!(route.validate(&input).is_ok());
    }

    #[test]
    fn test_generate_image_needs_no_fields() {
        let route = route(Method::POST, "/generate-image");
        let input = RouteInput::from_json(b"{}").unwrap();
        assert!(route.validate(&input).is_ok());
    }

    #[test]
    fn test_title_text() {
        let body: GenerateImageBody = serde_json::from_str(r#"{"title":"Acme"}"#).unwrap();
        assert_eq!(body.title_text(), "Acme");
        let body: GenerateImageBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.title_text(), "");
        let body: GenerateImageBody = serde_json::from_str(r#"{"title":42}"#).unwrap();
        assert_eq!(body.title_text(), "42");
    }

    #[test]
    fn test_non_object_body_rejected() {
        assert!(RouteInput::from_json(b"[1,2]").is_err());
        assert!(RouteInput::from_json(b"not json").is_err());
    }

    #[test]
    fn test_failure_shaping() {
        let generate = route(Method::POST, "/generate-image");
        let err = generate.upstream_failure(UpstreamError::MissingField("data[0].b64_json"));
        assert_eq!(err.to_string(), "Image generation failed");

        let places = route(Method::GET, "/google-places-autocomplete");
        let err = places.upstream_failure(UpstreamError::Status {
            status: 403,
            message: "Request failed with status code 403".into(),
        });
        assert_eq!(err.to_string(), "Request failed with status code 403");
    }
}
