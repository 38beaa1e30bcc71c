//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay handler
//! - Wire up middleware (request ID, tracing, CORS, JSON content type)
//! - Bind server to listener
//! - Dispatch requests through the route table
//! - Relay provider responses and shape errors
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::middleware::{cors_middleware, CorsPolicy};
use crate::http::request::{read_body, request_id, BodyError, QueryParams};
use crate::http::response::RelayError;
use crate::observability::metrics;
use crate::resilience::with_deadline;
use crate::routing::{Input, Route, RouteInput, RouteTable, ROUTES};
use crate::upstream::Upstreams;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: RouteTable,
    pub upstreams: Arc<Upstreams>,
    pub request_timeout: Duration,
    pub max_body_size: usize,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and provider clients.
    pub fn new(config: RelayConfig, upstreams: Upstreams) -> Self {
        let state = AppState {
            routes: RouteTable::new(),
            upstreams: Arc::new(upstreams),
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
            max_body_size: config.limits.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let cors = Arc::new(CorsPolicy::new(&config.cors));

        Router::new()
            .route("/{*path}", any(relay_handler))
            .route("/", any(relay_handler))
            .with_state(state)
            .layer(middleware::from_fn_with_state(cors, cors_middleware))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = ROUTES.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Relay handler: match, validate, call the provider, relay the result.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers()).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let route = match state.routes.match_route(&method, &path) {
        Some(route) => route,
        None => {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, "No route matched");
            metrics::record_request("none", StatusCode::NOT_FOUND.as_u16(), start_time);
            return RelayError::InvalidRoute.into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = route.name,
        "Relaying request"
    );

    let result = with_deadline(state.request_timeout, relay(&state, route, request)).await;
    let response = match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            log_failure(&request_id, route, &e);
            e.into_response()
        }
    };

    metrics::record_request(route.name, response.status().as_u16(), start_time);
    tracing::info!(
        request_id = %request_id,
        route = route.name,
        status = response.status().as_u16(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Request relayed"
    );
    response
}

async fn relay(state: &AppState, route: &'static Route, request: Request<Body>) -> Result<Value, RelayError> {
    let (parts, body) = request.into_parts();

    let input = match route.input {
        Input::Query => RouteInput::Query(QueryParams::parse(parts.uri.query())),
        Input::JsonBody => {
            let bytes = read_body(body, state.max_body_size)
                .await
                .map_err(|e| match e {
                    BodyError::TooLarge => RelayError::PayloadTooLarge,
                    BodyError::Read(e) => route.input_failure(e),
                })?;
            RouteInput::from_json(&bytes).map_err(|e| route.input_failure(e))?
        }
    };

    route.validate(&input)?;

    route
        .invoke(&state.upstreams, input)
        .await
        .map_err(|e| route.upstream_failure(e))
}

fn log_failure(request_id: &str, route: &Route, err: &RelayError) {
    let source = std::error::Error::source(err).map(ToString::to_string);
    match err {
        RelayError::MissingParameter(_) | RelayError::MissingInput(_) | RelayError::PayloadTooLarge => {
            tracing::warn!(request_id = %request_id, route = route.name, error = %err, "Rejected request");
        }
        _ => {
            tracing::error!(
                request_id = %request_id,
                route = route.name,
                error = %err,
                source = source.as_deref().unwrap_or(""),
                "Relay failed"
            );
        }
    }
}
