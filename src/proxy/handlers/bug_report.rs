// Bug report relay
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use chrono::Utc;
use serde_json::json;
use tracing::{error, info, warn};

use crate::models::BugReport;
use crate::modules::bug_report::build_webhook_payload;
use crate::proxy::server::AppState;

/// POST /api/report-bug
pub async fn handle_report_bug(State(state): State<AppState>, body: Bytes) -> Response {
    let report: BugReport = match serde_json::from_slice(&body) {
        Ok(report) => report,
        Err(e) => {
            error!("Error sending bug report: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to send bug report" })),
            )
                .into_response();
        }
    };

    if !report.is_complete() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing required fields" })),
        )
            .into_response();
    }

    let payload = build_webhook_payload(&report, &state.bug_report.recipient, Utc::now());
    let webhook_url = state.bug_report.webhook_url.as_deref();

    match webhook_url {
        Some(url) => {
            info!("Sending bug report for thread {} to webhook", payload.thread_id);
            match state.upstream.post_json(url, &payload).await {
                Ok(response) if response.status().is_success() => {
                    info!("Bug report sent via webhook successfully");
                }
                Ok(response) => {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    warn!(
                        "Webhook failed with status {}, falling back to log: {}",
                        status, text
                    );
                }
                Err(e) => {
                    warn!("Webhook error, falling back to log: {}", e);
                }
            }
        }
        None => info!("No webhook URL configured, only logging the bug report"),
    }

    // The report always lands in the log
    info!(
        to = %payload.to,
        subject = %payload.subject,
        "=== BUG REPORT ===\n{}",
        payload.body
    );

    let message = if webhook_url.is_some() {
        "Bug report sent via webhook"
    } else {
        "Bug report logged to console"
    };
    Json(json!({ "success": true, "message": message })).into_response()
}
