// Authenticated pass-through to the agent-execution server
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::proxy::common::response::internal_error;
use crate::proxy::middleware::auth::{extract_bearer_token, log_auth_presence, MissingCredential};
use crate::proxy::server::AppState;
use crate::proxy::upstream::UpstreamClient;

/// Mount point of the forwarded API on the gateway
pub const API_PREFIX: &str = "/api";

/// Largest inbound body read for POST/PUT
pub const MAX_BODY_BYTES: usize = 100 * 1024 * 1024;

const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Handle GET/POST/PUT/DELETE under `/api`
pub async fn handle_forward(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let path = backend_path(parts.uri.path()).to_string();

    log_auth_presence(&parts.headers, &path);

    let Some(token) = extract_bearer_token(&parts.headers).map(str::to_string) else {
        error!("No authorization token found in request headers: {} /{}", parts.method, path);
        return MissingCredential.into_response();
    };

    // GET and DELETE never read the body
    let body = if matches!(parts.method, Method::POST | Method::PUT) {
        match to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!("Failed to read request body: {}", e);
                return internal_error(&e.to_string());
            }
        }
    } else {
        None
    };

    forward_request(&state.upstream, parts.method, &path, &parts.headers, &token, body).await
}

/// Path below the `/api` mount, as it appeared on the wire (no decoding)
pub fn backend_path(uri_path: &str) -> &str {
    let rest = uri_path.strip_prefix(API_PREFIX).unwrap_or(uri_path);
    rest.strip_prefix('/').unwrap_or(rest)
}

/// Forward one request and relay whatever the backend answers. Transport
/// failures become a 500 envelope; backend error statuses are relayed as-is.
pub async fn forward_request(
    upstream: &UpstreamClient,
    method: Method,
    path: &str,
    inbound_headers: &HeaderMap,
    token: &str,
    body: Option<Bytes>,
) -> Response {
    match relay(upstream, method, path, inbound_headers, token, body).await {
        Ok(response) => response,
        Err(e) => {
            error!("Proxy error: {}", e);
            internal_error(&e.to_string())
        }
    }
}

async fn relay(
    upstream: &UpstreamClient,
    method: Method,
    path: &str,
    inbound_headers: &HeaderMap,
    token: &str,
    body: Option<Bytes>,
) -> AppResult<Response> {
    let outbound_headers = outbound_headers(inbound_headers, token)?;

    info!(
        "Forwarding request: {} {} (body: {} bytes)",
        method,
        upstream.build_url(path),
        body.as_ref().map(Bytes::len).unwrap_or(0)
    );

    let upstream_response = upstream
        .forward(method, path, outbound_headers, body)
        .await?;

    let status = upstream_response.status();
    info!("Response received: {} for /{}", status, path);

    let content_type = upstream_response
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    let reason = upstream_response
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .cloned();

    let bytes = upstream_response.bytes().await?;

    let mut response = (status, Body::from(bytes)).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type);
    if let Some(reason) = reason {
        response.extensions_mut().insert(reason);
    }
    Ok(response)
}

/// `Content-Type` if the caller sent one, plus a re-derived bearer header
fn outbound_headers(inbound: &HeaderMap, token: &str) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(content_type) = inbound.get(header::CONTENT_TYPE) {
        headers.insert(header::CONTENT_TYPE, content_type.clone());
    }
    let authorization = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| AppError::Upstream(format!("Invalid authorization header: {}", e)))?;
    headers.insert(header::AUTHORIZATION, authorization);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_path() {
        assert_eq!(backend_path("/api/threads/abc123/runs"), "threads/abc123/runs");
        assert_eq!(backend_path("/api/"), "");
        assert_eq!(backend_path("/api"), "");
        assert_eq!(backend_path("/api/a%20b/c"), "a%20b/c");
    }

    #[test]
    fn test_outbound_headers_allow_list() {
        let mut inbound = HeaderMap::new();
        inbound.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        inbound.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer  tok"));
        inbound.insert(header::COOKIE, HeaderValue::from_static("session=1"));
        inbound.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));

        let outbound = outbound_headers(&inbound, "tok").unwrap();

        assert_eq!(outbound.len(), 2);
        assert_eq!(outbound[header::CONTENT_TYPE], "application/json");
        assert_eq!(outbound[header::AUTHORIZATION], "Bearer tok");
    }

    #[test]
    fn test_outbound_headers_without_content_type() {
        let outbound = outbound_headers(&HeaderMap::new(), "abc").unwrap();
        assert_eq!(outbound.len(), 1);
        assert!(outbound.get(header::CONTENT_TYPE).is_none());
    }
}
