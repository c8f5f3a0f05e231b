// Share snapshot handlers
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::SharedThread;
use crate::modules::db::format_timestamp;
use crate::proxy::common::response::{error_response, internal_error};
use crate::proxy::middleware::auth::{extract_bearer_token, log_auth_presence, MissingCredential};
use crate::proxy::server::AppState;
use crate::proxy::upstream::{AuthClient, StaticToken};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub assistant_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareQuery {
    #[serde(default)]
    pub share_id: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// POST /api/share
pub async fn handle_create_share(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request: CreateShareRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            error!("Share API error: {}", e);
            return internal_error(&e.to_string());
        }
    };

    let (Some(thread_id), Some(api_url), Some(_assistant_id)) = (
        non_empty(&request.thread_id),
        non_empty(&request.api_url),
        non_empty(&request.assistant_id),
    ) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing required parameters",
            "threadId, apiUrl, and assistantId are required",
        );
    };

    log_auth_presence(&headers, "share");
    let Some(token) = extract_bearer_token(&headers) else {
        return MissingCredential.into_response();
    };

    let client = AuthClient::new(
        state.upstream.http_client().clone(),
        StaticToken::new(token),
    )
    .with_api_key(state.api_key.clone());

    let thread = match fetch_thread(&client, api_url, thread_id).await {
        Ok(Some(thread)) => thread,
        Ok(None) => {
            return error_response(
                StatusCode::NOT_FOUND,
                "Thread not found",
                "The specified thread could not be found",
            );
        }
        Err(e) => {
            error!("Share API error: {}", e);
            return internal_error(&e.to_string());
        }
    };

    let share = SharedThread::new(thread_id, thread, Utc::now());
    if let Err(e) = state.share_store.insert(&share) {
        error!("Error storing shared thread: {}", e);
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create share",
            "Could not store the thread snapshot",
        );
    }

    let share_url = format!(
        "{}/shared/{}",
        share_origin(state.public_base_url.as_deref(), &headers),
        share.share_id
    );
    info!("Thread {} shared as {}", share.thread_id, share.share_id);

    Json(json!({
        "shareId": share.share_id,
        "shareUrl": share_url,
        "message": "Thread shared successfully",
    }))
    .into_response()
}

/// GET /api/share?shareId=...
pub async fn handle_get_share(
    State(state): State<AppState>,
    Query(query): Query<ShareQuery>,
) -> Response {
    let Some(share_id) = non_empty(&query.share_id) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Share ID required",
            "Please provide a share ID",
        );
    };

    let share = match state.share_store.get(share_id) {
        Ok(Some(share)) => share,
        Ok(None) => {
            return error_response(
                StatusCode::NOT_FOUND,
                "Share not found",
                "The shared thread could not be found or has expired",
            );
        }
        Err(e) => {
            error!("Get shared thread error: {}", e);
            return internal_error(&e.to_string());
        }
    };

    if share.is_expired(Utc::now()) {
        return error_response(
            StatusCode::GONE,
            "Share expired",
            "This shared thread has expired",
        );
    }

    Json(json!({
        "thread": share.thread_data,
        "shareId": share.share_id,
        "createdAt": format_timestamp(&share.created_at),
        "expiresAt": format_timestamp(&share.expires_at),
    }))
    .into_response()
}

/// Read a thread from the agent server. `None` when it does not exist.
async fn fetch_thread(
    client: &AuthClient<StaticToken>,
    api_url: &str,
    thread_id: &str,
) -> AppResult<Option<Value>> {
    let url = format!("{}/threads/{}", api_url.trim_end_matches('/'), thread_id);
    let response = client.get(&url).await.send().await?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        warn!("Thread {} not found upstream", thread_id);
        return Ok(None);
    }
    if !status.is_success() {
        return Err(AppError::Upstream(format!(
            "Fetching thread {} failed with status {}",
            thread_id, status
        )));
    }

    let thread: Value = response.json().await?;
    Ok(if thread.is_null() { None } else { Some(thread) })
}

/// Configured public origin, else `http://<Host>`; relative when neither is known
fn share_origin(public_base_url: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(base) = public_base_url {
        return base.trim_end_matches('/').to_string();
    }
    headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|host| format!("http://{}", host))
        .unwrap_or_default()
}
