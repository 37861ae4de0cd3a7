//! HTTP adapters - REST API implementations.

pub mod router;
pub mod support;

// Re-export key types for convenience
pub use router::{app_router, HttpSettings};
pub use support::SupportAppState;
