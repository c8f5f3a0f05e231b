use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const UNKNOWN_USER: &str = "Unknown User";

/// Bug report submitted by the chat front-end
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugReport {
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub thread_title: Option<String>,
    #[serde(default)]
    pub message_history: Option<MessageHistory>,
    #[serde(default)]
    pub user_email: Option<String>,
}

/// History as the front-end sends it: pre-rendered text or the raw thread messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageHistory {
    Text(String),
    Messages(Vec<Value>),
}

impl MessageHistory {
    pub fn is_empty(&self) -> bool {
        match self {
            MessageHistory::Text(text) => text.is_empty(),
            MessageHistory::Messages(messages) => messages.is_empty(),
        }
    }
}

impl BugReport {
    /// Thread id, title and history must all be present and non-empty
    pub fn is_complete(&self) -> bool {
        [&self.thread_id, &self.thread_title]
            .iter()
            .all(|field| field.as_deref().is_some_and(|s| !s.is_empty()))
            && self.message_history.as_ref().is_some_and(|h| !h.is_empty())
    }

    pub fn user_label(&self) -> &str {
        match self.user_email.as_deref() {
            Some(email) if !email.is_empty() => email,
            _ => UNKNOWN_USER,
        }
    }
}

/// JSON body posted to the bug report webhook
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub thread_id: String,
    pub user_email: String,
    pub timestamp: String,
}
