// Bearer credential extraction
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::proxy::common::response::error_response;

/// Exact, case-sensitive prefix of a bearer `Authorization` value
pub const BEARER_PREFIX: &str = "Bearer ";

pub const MISSING_TOKEN_ERROR: &str = "Authorization token required";
pub const MISSING_TOKEN_MESSAGE: &str =
    "No authorization header found in request. Please ensure you are logged in.";

/// Token following `Bearer ` in the `Authorization` header.
///
/// A missing header, a value that is not visible ASCII, a different scheme or an
/// empty token all count as no credential.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
}

/// Log auth presence for a request without exposing the token itself
pub fn log_auth_presence(headers: &HeaderMap, route: &str) {
    let token = extract_bearer_token(headers);
    tracing::debug!(
        route,
        has_auth_header = headers.contains_key(header::AUTHORIZATION),
        has_token = token.is_some(),
        token_length = token.map(str::len).unwrap_or(0),
        "Auth check"
    );
}

/// Rejection for requests without a usable bearer token
#[derive(Debug, Clone, Copy)]
pub struct MissingCredential;

impl IntoResponse for MissingCredential {
    fn into_response(self) -> Response {
        error_response(
            StatusCode::UNAUTHORIZED,
            MISSING_TOKEN_ERROR,
            MISSING_TOKEN_MESSAGE,
        )
    }
}

/// Extractor yielding the caller's bearer token or rejecting with 401
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = MissingCredential;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        log_auth_presence(&parts.headers, parts.uri.path());
        extract_bearer_token(&parts.headers)
            .map(|token| BearerToken(token.to_string()))
            .ok_or(MissingCredential)
    }
}
