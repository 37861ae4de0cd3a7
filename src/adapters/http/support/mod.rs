//! HTTP adapters for customer support
//!
//! Exposes the support relay over REST.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{SupportAppState, REQUEST_ID_HEADER};
pub use routes::routes;
