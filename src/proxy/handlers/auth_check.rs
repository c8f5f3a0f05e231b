// Token check against the identity provider
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::error;

use crate::proxy::common::response::{error_response, internal_error};
use crate::proxy::middleware::BearerToken;
use crate::proxy::server::AppState;

/// GET /api/test-auth
pub async fn handle_test_auth(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Response {
    let Some(identity) = state.identity.as_ref() else {
        error!("Test auth error: identity provider is not configured");
        return internal_error("Identity provider is not configured");
    };

    match identity.get_user(&token).await {
        Ok(Some(user)) => Json(json!({
            "success": true,
            "user": {
                "id": user.id,
                "email": user.email,
            },
            "message": "Authentication successful",
        }))
        .into_response(),
        Ok(None) => error_response(
            StatusCode::UNAUTHORIZED,
            "Invalid token",
            "The provided token is invalid or expired",
        ),
        Err(e) => {
            error!("Test auth error: {}", e);
            internal_error(&e.to_string())
        }
    }
}
