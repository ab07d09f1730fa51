//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, backend client, enricher produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line via the request span
//! - Metrics are cheap (atomic increments) and optional

pub mod logging;
pub mod metrics;
