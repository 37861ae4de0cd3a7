//! Route definitions for support endpoints

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{handle_support, health, list_agents, SupportAppState};

/// Create support router with all endpoints
///
/// # Endpoints
///
/// - `POST /api/support` - Answer a conversation
/// - `GET /api/agents` - List agent personas
/// - `GET /api/health` - Liveness probe
pub fn routes() -> Router<SupportAppState> {
    Router::new()
        .route("/api/support", post(handle_support))
        .route("/api/agents", get(list_agents))
        .route("/api/health", get(health))
}
