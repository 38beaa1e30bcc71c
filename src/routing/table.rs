//! The relay's route table.
//!
//! Each entry declares where its input comes from, which keys must be present,
//! and which provider call serves it. Adding a route means adding a row here
//! and a `Target` arm in `dispatch.rs`.

use axum::http::Method;

/// Where a route reads its parameters from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Query,
    JsonBody,
}

/// The provider call behind a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    FlightSearch,
    ImageSearch,
    PlacesAutocomplete,
    PlacesDetails,
    PlacesNearby,
    GenerateImage,
    UploadImage,
}

impl Target {
    /// Fixed message reported instead of the underlying error, if any.
    pub fn failure_message(&self) -> Option<&'static str> {
        match self {
            Target::GenerateImage => Some("Image generation failed"),
            Target::UploadImage => Some("Image upload failed"),
            _ => None,
        }
    }
}

/// One (method, path) pair the relay answers.
#[derive(Debug)]
pub struct Route {
    /// Label for logs and metrics.
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
    pub input: Input,
    /// Keys that must be present and non-empty; checked before any provider call.
    pub required: &'static [&'static str],
    /// Replaces the per-key message when any required key is missing.
    pub missing_message: Option<&'static str>,
    pub target: Target,
}

pub static ROUTES: [Route; 7] = [
    Route {
        name: "search_flights",
        method: Method::GET,
        path: "/search-flights",
        input: Input::Query,
        required: &["engine"],
        missing_message: None,
        target: Target::FlightSearch,
    },
    Route {
        name: "get_image",
        method: Method::GET,
        path: "/get-image",
        input: Input::Query,
        required: &["query"],
        missing_message: None,
        target: Target::ImageSearch,
    },
    Route {
        name: "places_autocomplete",
        method: Method::GET,
        path: "/google-places-autocomplete",
        input: Input::Query,
        required: &["input"],
        missing_message: None,
        target: Target::PlacesAutocomplete,
    },
    Route {
        name: "places_details",
        method: Method::GET,
        path: "/google-places-details",
        input: Input::Query,
        required: &["place_id"],
        missing_message: None,
        target: Target::PlacesDetails,
    },
    Route {
        name: "places_nearby",
        method: Method::GET,
        path: "/google-places-nearby",
        input: Input::Query,
        required: &["location"],
        missing_message: None,
        target: Target::PlacesNearby,
    },
    Route {
        name: "generate_image",
        method: Method::POST,
        path: "/generate-image",
        input: Input::JsonBody,
        required: &[],
        missing_message: None,
        target: Target::GenerateImage,
    },
    Route {
        name: "upload_image",
        method: Method::POST,
        path: "/upload-image",
        input: Input::JsonBody,
        required: &["imageBinary", "fileName"],
        missing_message: Some("Missing imageBinary or fileName"),
        target: Target::UploadImage,
    },
];

/// Immutable lookup over the route table.
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    routes: &'static [Route],
}

impl RouteTable {
    pub fn new() -> Self {
        Self { routes: &ROUTES }
    }

    /// Exact match on both method and path; anything else is not a route.
    pub fn match_route(&self, method: &Method, path: &str) -> Option<&'static Route> {
        self.routes
            .iter()
            .find(|route| route.method == *method && route.path == path)
    }

    pub fn routes(&self) -> &'static [Route] {
        self.routes
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}
