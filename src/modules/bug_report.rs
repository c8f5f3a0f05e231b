use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::models::{BugReport, MessageHistory, WebhookPayload};

pub fn compose_subject(report: &BugReport) -> String {
    format!(
        "[AGENT BUG] {} / {}",
        report.thread_id.as_deref().unwrap_or_default(),
        report.user_label()
    )
}

pub fn compose_body(report: &BugReport, now: DateTime<Utc>) -> String {
    format!(
        "Thread ID: {}\nThread Title: {}\nUser: {}\n\nMessage History:\n{}\n\n---\nThis bug report was generated automatically from the chat frontend.",
        report.thread_id.as_deref().unwrap_or_default(),
        report.thread_title.as_deref().unwrap_or_default(),
        report.user_label(),
        history_text(report, now),
    )
    .trim()
    .to_string()
}

pub fn build_webhook_payload(
    report: &BugReport,
    recipient: &str,
    now: DateTime<Utc>,
) -> WebhookPayload {
    WebhookPayload {
        to: recipient.to_string(),
        subject: compose_subject(report),
        body: compose_body(report, now),
        thread_id: report.thread_id.clone().unwrap_or_default(),
        user_email: report.user_label().to_string(),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Raw thread messages are rendered here; text arrives already formatted
fn history_text(report: &BugReport, now: DateTime<Utc>) -> String {
    match &report.message_history {
        Some(MessageHistory::Text(text)) => text.clone(),
        Some(MessageHistory::Messages(messages)) => format_message_history(messages, now),
        None => String::new(),
    }
}

/// Render thread messages as the plain-text history attached to a bug report.
///
/// Each entry reads `[n] <timestamp> - <ROLE>:` followed by its content; entries
/// are separated by `---` lines. Messages carry no timestamp of their own, so
/// `now` is stamped on every entry.
pub fn format_message_history(messages: &[Value], now: DateTime<Utc>) -> String {
    let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    messages
        .iter()
        .enumerate()
        .map(|(index, message)| {
            let role = message
                .get("type")
                .and_then(Value::as_str)
                .filter(|r| !r.is_empty())
                .unwrap_or("unknown");
            let content = render_content(message.get("content").unwrap_or(&Value::Null));
            format!(
                "[{}] {} - {}:\n{}\n",
                index + 1,
                timestamp,
                role.to_uppercase(),
                content
            )
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}

fn render_content(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .map(|part| match part {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}
