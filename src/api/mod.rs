//! HTTP surface for the triage core.
//!
//! `api_router()` returns a composable `Router` with all routes under
//! `/api/`. The binary mounts it on a plain axum server.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod types;

pub use router::api_router;
pub use types::ApiContext;
