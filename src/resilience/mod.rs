//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → client-wide connect/request timeouts (backend::client)
//!     → timeouts.rs (per-route deadline with static fallback)
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - No retries: mutations are forwarded once and the backend owns
//!   idempotency

pub mod timeouts;
