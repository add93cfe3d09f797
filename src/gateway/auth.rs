//! Authentication middleware
//!
//! Validates the caller-supplied shared secret before anything else touches
//! the request. On mismatch or absence the request is rejected with a 401
//! and no upstream call is made; no credential material is touched beyond
//! the equality check itself.

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, warn};

use super::router::AppState;

/// Header carrying the shared gateway secret.
pub const SECRET_HEADER: &str = "x-proxy-secret";

/// Paths that bypass authentication.
const PUBLIC_PATHS: &[&str] = &["/health"];

/// Check if a path is public (bypasses auth)
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

/// Authentication middleware
///
/// Runs before every handler. `/health` passes through; everything else
/// requires an `x-proxy-secret` header exactly equal to the configured
/// gateway secret.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path();

    if is_public_path(path) {
        debug!(path = %path, "Public path, skipping auth");
        return next.run(request).await;
    }

    let presented = request
        .headers()
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok());

    match presented {
        Some(secret) if secret == state.credentials.gateway_secret() => next.run(request).await,
        Some(_) => {
            warn!(path = %path, "Invalid proxy secret");
            unauthorized_response()
        }
        None => {
            warn!(path = %path, "Missing proxy secret header");
            unauthorized_response()
        }
    }
}

/// Create a 401 Unauthorized response
fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized" })),
    )
        .into_response()
}
