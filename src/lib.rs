//! HR portal API gateway.
//!
//! Validates portal requests, forwards them to the HR backend with the
//! caller's bearer token, enriches employee listings and reports every
//! failure as `{ "error": "..." }`.

pub mod auth;
pub mod backend;
pub mod config;
pub mod enrichment;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routes;
pub mod validation;

pub use backend::BackendClient;
pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
