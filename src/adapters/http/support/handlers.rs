//! HTTP handlers for support endpoints
//!
//! These handlers connect Axum routes to the support request handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::handlers::support::{
    ErrorKind, SupportRequestCommand, SupportRequestError, SupportRequestHandler,
};
use crate::domain::foundation::Timestamp;
use crate::domain::support::{agent_catalog, AgentConfig, Conversation};

use super::dto::{
    AgentsResponse, ErrorResponse, HealthResponse, MessageDto, SupportRequest, SupportResponse,
};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct SupportAppState {
    pub handler: SupportRequestHandler,
}

impl SupportAppState {
    pub fn new(handler: SupportRequestHandler) -> Self {
        Self { handler }
    }
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::ClientInput => StatusCode::BAD_REQUEST,
        ErrorKind::Configuration | ErrorKind::UpstreamProvider => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_reply(err: &SupportRequestError) -> ErrorReply {
    (status_for(err.kind()), Json(ErrorResponse::from(err)))
}

fn trace_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// Answer the latest customer turn
///
/// POST /api/support
pub async fn handle_support(
    State(app_state): State<SupportAppState>,
    headers: HeaderMap,
    payload: Result<Json<SupportRequest>, JsonRejection>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    let Json(req) = payload.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::client_input(rejection.body_text())),
        )
    })?;

    let agent = AgentConfig::try_from(req.agent_config)
        .map_err(|e| error_reply(&SupportRequestError::from(e)))?;

    let cmd = SupportRequestCommand {
        conversation: Conversation::from(req.conversation),
        agent,
        trace_id: trace_id(&headers),
    };

    let result = app_state
        .handler
        .handle(cmd)
        .await
        .map_err(|e| error_reply(&e))?;

    let response = SupportResponse {
        response: MessageDto::from(&result.response),
    };

    Ok::<_, ErrorReply>((StatusCode::OK, Json(response)))
}

/// List the available agent personas
///
/// GET /api/agents
pub async fn list_agents() -> impl IntoResponse {
    Json(AgentsResponse {
        agents: agent_catalog(),
    })
}

/// Liveness probe
///
/// GET /api/health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        timestamp: Timestamp::now().to_iso8601(),
    })
}
