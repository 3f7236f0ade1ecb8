//! Seed HTTP route handlers.
//!
//! Handlers run `SeedService` calls on the blocking pool and map
//! `SeedError` to the wire error body in one place.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use otpd_common::error::ErrorCode;

use crate::error::SeedError;
use crate::protocol::{
    DecryptRequest, DecryptResponse, GenerateResponse, VerifyRequest, VerifyResponse,
};
use crate::SeedService;

pub(crate) fn routes(state: Arc<SeedService>) -> Router {
    Router::new()
        .route("/decrypt-seed", post(decrypt_seed_handler))
        .route("/generate-2fa", get(generate_handler))
        .route("/verify-2fa", post(verify_handler))
        .with_state(state)
}

/// POST /decrypt-seed: Decrypt the submitted seed and persist it.
async fn decrypt_seed_handler(
    State(state): State<Arc<SeedService>>,
    payload: Result<Json<DecryptRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(p) => p,
        Err(rejection) => return payload_error(rejection),
    };

    let encrypted_seed = request.encrypted_seed;
    match run_blocking(&state, move |svc| svc.decrypt_and_store(&encrypted_seed)).await {
        Ok(()) => (StatusCode::OK, Json(DecryptResponse::ok())).into_response(),
        Err(resp) => resp,
    }
}

/// GET /generate-2fa: Current code and seconds until it changes.
async fn generate_handler(State(state): State<Arc<SeedService>>) -> Response {
    match run_blocking(&state, |svc| svc.generate()).await {
        Ok(generated) => Json(GenerateResponse {
            code: generated.code,
            valid_for: generated.valid_for,
        })
        .into_response(),
        Err(resp) => resp,
    }
}

/// POST /verify-2fa: Check a code against the current window.
async fn verify_handler(
    State(state): State<Arc<SeedService>>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(p) => p,
        Err(rejection) => return payload_error(rejection),
    };

    let code = request.code.unwrap_or_default();
    match run_blocking(&state, move |svc| svc.verify(&code)).await {
        Ok(valid) => Json(VerifyResponse { valid }).into_response(),
        Err(resp) => resp,
    }
}

/// Run a service call on the blocking pool, turning failures into responses.
async fn run_blocking<T, F>(state: &Arc<SeedService>, op: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(&SeedService) -> Result<T, SeedError> + Send + 'static,
{
    let state = Arc::clone(state);
    match tokio::task::spawn_blocking(move || op(&state)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(error_response(&e)),
        Err(e) => {
            tracing::error!(error = %e, "Seed task failed");
            Err(otpd_common::http::error_response(
                ErrorCode::Internal,
                "internal error",
            ))
        }
    }
}

fn error_response(error: &SeedError) -> Response {
    let code = ErrorCode::from(error);
    if code.http_status() >= 500 {
        tracing::warn!(error = %error, "Seed request failed");
    } else {
        tracing::debug!(error = %error, "Seed request rejected");
    }
    otpd_common::http::error_response(code, error.to_string())
}

fn payload_error(rejection: JsonRejection) -> Response {
    tracing::debug!(error = %rejection, "Rejected request body");
    otpd_common::http::error_response(ErrorCode::InvalidPayload, rejection.body_text())
}
