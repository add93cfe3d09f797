//! HTTP router and handlers
//!
//! Builds the axum router from the fixed route table and hosts the handlers
//! that bridge inbound requests to the forwarding engine: the static health
//! check, token issuance with its form-encoded body, and the generic relay
//! used by every table entry (named routes and the `/proxy` wildcard alike).

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::{RawPathParams, RawQuery, State},
    http::{
        HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{MethodFilter, any, get, on, post},
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use super::auth::auth_middleware;
use super::environment::Environment;
use super::forward::{Forwarder, UpstreamRequest, UpstreamResponse};
use super::routes::{ENDPOINTS, Endpoint};
use crate::credentials::CredentialSet;

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "cora-proxy";

/// Shared application state
pub struct AppState {
    /// Process-lifetime credential set (read-only)
    pub credentials: Arc<CredentialSet>,
    /// Forwarding engine
    pub forwarder: Arc<dyn Forwarder>,
}

/// Create the router
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/oauth/token", post(token_handler));

    // Named routes and the wildcard come from the same table and resolve to
    // the same relay call; the wildcard entry is registered last.
    for endpoint in ENDPOINTS {
        let handler = move |State(state): State<Arc<AppState>>,
                            method: Method,
                            params: RawPathParams,
                            RawQuery(query): RawQuery,
                            headers: HeaderMap,
                            body: Bytes| async move {
            relay(endpoint, state, method, &params, query.as_deref(), &headers, body).await
        };

        let method_router = match &endpoint.method {
            Some(m) => on(
                MethodFilter::try_from(m.clone()).expect("route table methods are standard"),
                handler,
            ),
            None => any(handler),
        };
        router = router.route(endpoint.path, method_router);
    }

    router
        // Authentication middleware (applied before other layers)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth_middleware,
        ))
        .layer(CatchPanicLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - static liveness payload, no auth, no upstream call
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": SERVICE_NAME }))
}

/// Token issuance request body
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    /// OAuth client identifier
    pub client_id: String,
    /// Environment indicator; only the literal `production` selects
    /// production
    #[serde(default)]
    pub environment: Option<String>,
}

/// POST /oauth/token - exchange client credentials at the upstream token
/// endpoint. Unlike every other route the environment comes from the JSON
/// body and the outbound body is form-encoded; there is no prior token to
/// pass through.
async fn token_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TokenRequest>,
) -> Response {
    let environment = Environment::from_indicator(request.environment.as_deref());
    let body = format!(
        "grant_type=client_credentials&client_id={}",
        request.client_id
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    );

    dispatch(
        state,
        UpstreamRequest {
            environment,
            method: Method::POST,
            path: "/token".to_string(),
            headers,
            body: Some(Bytes::from(body)),
        },
    )
    .await
}

/// Shared relay for every route-table entry: resolve environment and
/// upstream path, pick the headers that propagate, and hand off to the
/// forwarding engine.
async fn relay(
    endpoint: &'static Endpoint,
    state: Arc<AppState>,
    method: Method,
    params: &RawPathParams,
    query: Option<&str>,
    headers: &HeaderMap,
    body: Bytes,
) -> Response {
    let environment = Environment::from_headers(headers);
    let captures: Vec<(&str, &str)> = params.iter().collect();
    let path = endpoint.upstream_path(&captures, query);

    // GET never carries a body; other methods forward the exact raw bytes
    // received.
    let has_body = method != Method::GET && !body.is_empty();

    dispatch(
        state,
        UpstreamRequest {
            environment,
            method,
            path,
            headers: upstream_headers(headers, has_body),
            body: has_body.then_some(body),
        },
    )
    .await
}

/// Execute the outbound call and convert the outcome to a caller response.
async fn dispatch(state: Arc<AppState>, request: UpstreamRequest) -> Response {
    match state.forwarder.forward(request).await {
        Ok(response) => relay_response(response),
        Err(e) => {
            error!(error = %e, "Upstream call failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Select the inbound headers that propagate upstream.
///
/// Only `Authorization` passes through (verbatim); the proxy secret and
/// environment indicator are gateway-internal and must not leak. A body
/// carries the inbound `Content-Type`, defaulting to `application/json`.
fn upstream_headers(inbound: &HeaderMap, has_body: bool) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Some(auth) = inbound.get(AUTHORIZATION) {
        headers.insert(AUTHORIZATION, auth.clone());
    }

    if has_body {
        let content_type = inbound
            .get(CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, content_type);
    }

    headers
}

/// Relay the upstream response verbatim: its status code, its raw body
/// bytes, and its headers minus hop-by-hop fields (content-length is
/// recomputed for the relayed body).
fn relay_response(upstream: UpstreamResponse) -> Response {
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;

    for (name, value) in &upstream.headers {
        if !is_hop_by_hop(name) {
            response.headers_mut().append(name.clone(), value.clone());
        }
    }

    response
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
            | "content-length"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_passes_through_verbatim() {
        let mut inbound = HeaderMap::new();
        inbound.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok-123"));
        inbound.insert("x-proxy-secret", HeaderValue::from_static("secret"));
        inbound.insert("x-environment", HeaderValue::from_static("production"));

        let outbound = upstream_headers(&inbound, false);
        assert_eq!(
            outbound.get(AUTHORIZATION),
            Some(&HeaderValue::from_static("Bearer tok-123"))
        );
        // Gateway-internal headers never leak upstream
        assert!(outbound.get("x-proxy-secret").is_none());
        assert!(outbound.get("x-environment").is_none());
    }

    #[test]
    fn body_defaults_content_type_to_json() {
        let outbound = upstream_headers(&HeaderMap::new(), true);
        assert_eq!(
            outbound.get(CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/json"))
        );
    }

    #[test]
    fn body_keeps_caller_content_type() {
        let mut inbound = HeaderMap::new();
        inbound.insert(CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
        let outbound = upstream_headers(&inbound, true);
        assert_eq!(
            outbound.get(CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/pdf"))
        );
    }

    #[test]
    fn bodyless_request_sends_no_content_type() {
        let mut inbound = HeaderMap::new();
        inbound.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let outbound = upstream_headers(&inbound, false);
        assert!(outbound.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn relay_response_preserves_status_and_strips_hop_by_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        headers.insert("connection", HeaderValue::from_static("close"));
        headers.insert("x-request-id", HeaderValue::from_static("abc"));

        let relayed = relay_response(UpstreamResponse {
            status: StatusCode::IM_A_TEAPOT,
            headers,
            body: Bytes::from_static(b"{\"ok\":true}"),
        });

        assert_eq!(relayed.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(
            relayed.headers().get(CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/json"))
        );
        assert_eq!(
            relayed.headers().get("x-request-id"),
            Some(&HeaderValue::from_static("abc"))
        );
        assert!(relayed.headers().get("transfer-encoding").is_none());
        assert!(relayed.headers().get("connection").is_none());
    }
}
