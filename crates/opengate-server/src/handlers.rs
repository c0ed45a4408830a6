//! HTTP handlers for the decision and authoring endpoints.
//!
//! Every internal failure is logged with its full diagnostic and answered
//! with a generic message; in particular an evaluation failure is a 500,
//! never a silent deny.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use opengate_core::{AccessRequest, PolicySpec};
use opengate_policy::{Decision, PolicyError};

use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "opengate",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn readyz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ready" }))
}

/// `POST /evaluate`: decide one access request against the active policy.
pub async fn evaluate(
    State(state): State<AppState>,
    payload: Result<Json<AccessRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected /evaluate payload");
            return (StatusCode::BAD_REQUEST, "Invalid JSON payload").into_response();
        }
    };

    match state.decisions.decide(&request) {
        Ok(Decision::Allow) => (StatusCode::OK, "Access granted").into_response(),
        Ok(Decision::Deny) => (StatusCode::FORBIDDEN, "Access denied").into_response(),
        Err(e) => policy_error_response(e),
    }
}

/// `POST /generate-policy`: author and persist one policy document.
pub async fn generate_policy(
    State(state): State<AppState>,
    payload: Result<Json<PolicySpec>, JsonRejection>,
) -> Response {
    let Json(spec) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected /generate-policy payload");
            return (StatusCode::BAD_REQUEST, "Invalid JSON payload").into_response();
        }
    };

    match state.authoring.author_policy(&spec).await {
        Ok(outcome) => {
            let body = json!({
                "status": "ok",
                "key": outcome.key,
                "reloadWarning": outcome.reload_warning,
            });
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => policy_error_response(e),
    }
}

/// Maps pipeline errors onto status codes, logging the full diagnostic and
/// answering with a generic message.
fn policy_error_response(err: PolicyError) -> Response {
    match &err {
        PolicyError::Validation(validation) => {
            tracing::debug!(error = %validation, "request failed validation");
            (StatusCode::BAD_REQUEST, validation.to_string()).into_response()
        }
        PolicyError::Render { .. } | PolicyError::Compile { .. } => {
            tracing::error!(error = %err, "policy generation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate policy").into_response()
        }
        PolicyError::Evaluation { .. } => {
            tracing::error!(error = %err, "policy evaluation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to evaluate policy").into_response()
        }
        PolicyError::NoActivePolicy => {
            tracing::error!("no active policy loaded");
            (StatusCode::INTERNAL_SERVER_ERROR, "No active policy loaded").into_response()
        }
        PolicyError::Storage(storage) => {
            tracing::error!(error = %storage, "policy store operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Policy store operation failed",
            )
                .into_response()
        }
    }
}
