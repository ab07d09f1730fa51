//! Backend service access.
//!
//! # Data Flow
//! ```text
//! route handler
//!     → BackendCall (method, path, query, body, token)
//!     → client.rs (reqwest, shared connection pool)
//!     → BackendResponse { status, body }  or  BackendError
//! ```

pub mod client;
pub mod error;

pub use client::{BackendBody, BackendCall, BackendClient, BackendResponse};
pub use error::BackendError;
