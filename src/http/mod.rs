//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, body extraction)
//!     → routes (token check, validation, backend call, enrichment)
//!     → response.rs (relay backend status + JSON)
//!     → error.rs (failures → { "error": ... })
//!     → Send to client
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use error::{ApiError, ErrorEnvelope};
pub use request::{JsonBody, RawBody, X_REQUEST_ID};
pub use server::{app, AppState, HttpServer};
