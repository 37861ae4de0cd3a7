//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Model providers (Gemini, mock)
//! - `http` - REST API (axum)

pub mod ai;
pub mod http;

pub use ai::{GeminiConfig, GeminiProvider, MockAIProvider};
pub use http::{app_router, HttpSettings, SupportAppState};
