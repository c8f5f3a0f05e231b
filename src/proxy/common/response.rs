// JSON error envelopes shared by the gateway handlers
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

pub const INTERNAL_ERROR: &str = "Internal server error";
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// `{ "error": ..., "message": ... }` with the given status
pub fn error_response(status: StatusCode, error: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error": error,
            "message": message,
        })),
    )
        .into_response()
}

/// 500 envelope; an empty message is reported as "Unknown error"
pub fn internal_error(message: &str) -> Response {
    let message = if message.is_empty() {
        UNKNOWN_ERROR
    } else {
        message
    };
    error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::header;

    #[tokio::test]
    async fn test_internal_error_envelope() {
        let response = internal_error("");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
        assert_eq!(json["message"], "Unknown error");
    }
}
