//! Shared helpers for gateway integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;

use portal_gateway::config::GatewayConfig;
use portal_gateway::http::{app, AppState};
use portal_gateway::BackendClient;

pub const TOKEN: &str = "test-token";

/// Router wired against `base_url`, with short backend deadlines.
pub fn test_app(base_url: &str) -> Router {
    test_app_with(base_url, |_| {})
}

/// Like [`test_app`], with further config adjustments applied last.
pub fn test_app_with(base_url: &str, adjust: impl FnOnce(&mut GatewayConfig)) -> Router {
    let mut config = GatewayConfig::default();
    config.backend.base_url = base_url.to_string();
    config.backend.connect_timeout_secs = 1;
    config.backend.request_timeout_secs = 5;
    config.backend.fallback_timeout_ms = 300;
    config.observability.metrics_enabled = false;
    adjust(&mut config);

    let backend = BackendClient::new(&config.backend).expect("valid backend url");
    app(AppState::new(config, backend))
}

/// Backend address nothing listens on.
pub const DEAD_BACKEND: &str = "http://127.0.0.1:1";

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn authed(method: Method, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
}

pub fn authed_get(uri: &str) -> Request<Body> {
    authed(Method::GET, uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: Method, uri: &str, body: Value, token: bool) -> Request<Body> {
    let builder = if token {
        authed(method, uri)
    } else {
        Request::builder().method(method).uri(uri)
    };
    builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let text = body_string(response).await;
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("invalid JSON ({e}): {text}"))
}
