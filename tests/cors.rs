//! CORS behaviour checked in-process against the layered router.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use travel_relay::routing::ROUTES;
use travel_relay::{HttpServer, Upstreams};

mod common;

const ALLOWED: &str = "http://localhost:5173";

fn router() -> Router {
    // nothing listens here; no test below reaches a provider
    let config = common::test_config("http://127.0.0.1:9");
    let upstreams = Upstreams::new(&config, None).unwrap();
    HttpServer::new(config, upstreams).router()
}

fn request(method: Method, uri: &str, origin: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(origin) = origin {
        builder = builder.header("origin", origin);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_preflight_on_every_route() {
    for route in ROUTES.iter() {
        let res = router()
            .oneshot(request(Method::OPTIONS, route.path, Some(ALLOWED)))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NO_CONTENT, "preflight for {}", route.path);
        assert_eq!(res.headers()["access-control-allow-origin"], ALLOWED);
        assert_eq!(res.headers()["access-control-allow-methods"], "POST, GET, OPTIONS");
        assert_eq!(res.headers()["access-control-allow-headers"], "Content-Type, Authorization");

        let body = res.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }
}

#[tokio::test]
async fn test_preflight_on_unknown_path() {
    let res = router()
        .oneshot(request(Method::OPTIONS, "/anything/else", Some(ALLOWED)))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(res.headers()["access-control-allow-origin"], ALLOWED);
}

#[tokio::test]
async fn test_foreign_origin_never_granted() {
    let evil = "https://evil.example";
    let cases = [
        (Method::OPTIONS, "/search-flights"),
        (Method::GET, "/search-flights"),
        (Method::GET, "/nope"),
    ];

    for (method, uri) in cases {
        let res = router().oneshot(request(method, uri, Some(evil))).await.unwrap();
        assert!(res.headers().get("access-control-allow-origin").is_none(), "{uri}");
        assert_eq!(res.headers()["access-control-allow-methods"], "POST, GET, OPTIONS");
    }
}

#[tokio::test]
async fn test_no_origin_header() {
    let res = router()
        .oneshot(request(Method::OPTIONS, "/get-image", None))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_allowed_origin_on_error_responses() {
    let res = router()
        .oneshot(request(Method::GET, "/nope", Some(ALLOWED)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers()["access-control-allow-origin"], ALLOWED);
    assert_eq!(res.headers()["content-type"], "application/json");

    let res = router()
        .oneshot(request(Method::GET, "/get-image", Some(ALLOWED)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.headers()["access-control-allow-origin"], ALLOWED);
    assert!(res.headers().get("x-request-id").is_some());

    let body = res.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "Missing 'query' parameter");
}
