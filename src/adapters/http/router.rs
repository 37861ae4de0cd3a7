//! Application router with the cross-cutting HTTP layers.

use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::Request;
use axum::{BoxError, Json, Router};
use http::{header, HeaderValue, Method, StatusCode};
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::support::{routes, ErrorResponse, SupportAppState, REQUEST_ID_HEADER};
use crate::application::handlers::support::ErrorKind;

/// Transport settings applied around the support routes.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub request_timeout: Duration,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(90),
            cors_origins: Vec::new(),
        }
    }
}

/// Build the full application: support routes, request ids, tracing, timeout and CORS.
pub fn app_router(state: SupportAppState, settings: &HttpSettings) -> Router {
    let request_id = header::HeaderName::from_static(REQUEST_ID_HEADER);

    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request| {
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "http_request",
            method = %req.method(),
            uri = %req.uri(),
            request_id = %request_id,
        )
    });

    routes()
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(trace)
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(settings.request_timeout))
                .layer(cors_layer(&settings.cors_origins)),
        )
}

/// A request that outlives the server timeout is still waiting on the model,
/// so it is reported as an upstream failure with the usual error payload.
async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<ErrorResponse>) {
    let detail = if err.is::<Elapsed>() {
        "Model provider error: request timed out".to_string()
    } else {
        format!("Unhandled internal error: {}", err)
    };
    warn!(error = %err, "Request failed in middleware");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            kind: ErrorKind::UpstreamProvider,
            detail,
        }),
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.is_empty() {
        return cors.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(allowed))
}
