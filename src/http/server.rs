//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all route handlers
//! - Wire up middleware (tracing, timeouts, body limits, request ID, metrics)
//! - Give error responses produced by layers the same `{ "error" }` body
//! - Bind server to listener
//! - Stop accepting on shutdown and drain in-flight requests

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{DefaultBodyLimit, MatchedPath, Request};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::backend::{BackendClient, BackendError};
use crate::config::GatewayConfig;
use crate::http::error::ApiError;
use crate::http::request::{request_id, UuidRequestId, X_REQUEST_ID};
use crate::observability::metrics;
use crate::routes;

/// Application state injected into handlers.
///
/// Built once per process. The backend client owns the only connection
/// pool; cloning the state clones handles, not pools.
#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    pub fn new(config: GatewayConfig, backend: BackendClient) -> Self {
        Self {
            backend,
            config: Arc::new(config),
        }
    }

    /// Deadline for routes that degrade to a static payload.
    pub fn fallback_timeout(&self) -> Duration {
        Duration::from_millis(self.config.backend.fallback_timeout_ms)
    }
}

/// Build the Axum application with all middleware layers.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    routes::router()
        .with_state(state)
        .layer(middleware::from_fn(track_requests))
        .layer(DefaultBodyLimit::max(config.security.max_body_size))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id(request),
                    )
                }))
                .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(config.timeouts.request_secs),
                )),
        )
        .layer(middleware::map_response(envelope_bare_errors))
}

/// Replace the body of non-JSON error responses (timeouts, body limits,
/// method mismatches) with the error envelope. Headers other than the
/// body's own are kept.
async fn envelope_bare_errors(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("application/json"));
    if is_json {
        return response;
    }

    let (parts, _) = response.into_parts();
    let mut replacement = ApiError::from_status(status).into_response();
    for (name, value) in &parts.headers {
        if *name == CONTENT_TYPE || *name == CONTENT_LENGTH {
            continue;
        }
        if !replacement.headers().contains_key(name) {
            replacement.headers_mut().insert(name.clone(), value.clone());
        }
    }
    replacement
}

/// Record per-route request metrics.
async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(&method, &route, response.status().as_u16(), start);
    response
}

/// HTTP server for the portal gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Create a new HTTP server, building the backend client from config.
    pub fn new(config: GatewayConfig) -> Result<Self, BackendError> {
        let backend = BackendClient::new(&config.backend)?;
        Ok(Self::with_state(AppState::new(config, backend)))
    }

    /// Create a server around already-built state.
    pub fn with_state(state: AppState) -> Self {
        let config = state.config.clone();
        Self {
            router: app(state),
            config,
        }
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.config.backend.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
