//! Router assembly and shared application state.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use opengate_config::AppConfig;
use opengate_policy::{DecisionEngine, PolicyAuthoring};

use crate::{handlers, middleware as app_middleware};

/// Shared handler state: the two pipeline entry points.
#[derive(Clone)]
pub struct AppState {
    pub decisions: Arc<DecisionEngine>,
    pub authoring: Arc<PolicyAuthoring>,
}

/// Builds the service router with middleware attached.
pub fn build_app(cfg: &AppConfig, state: AppState) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        // Policy pipeline; non-POST methods answer 405 via method routing
        .route("/evaluate", post(handlers::evaluate))
        .route("/generate-policy", post(handlers::generate_policy))
        .with_state(state)
        // Middleware stack (order: request id -> trace -> body limit)
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let req_id = req
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                tracing::info_span!(
                    "http.request",
                    http.method = %method,
                    http.target = %uri,
                    request_id = %req_id
                )
            }),
        )
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
}
