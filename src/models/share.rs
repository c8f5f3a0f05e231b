use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// Point-in-time copy of a conversation thread, readable until `expires_at`
#[derive(Debug, Clone, PartialEq)]
pub struct SharedThread {
    pub share_id: String,
    pub thread_id: String,
    pub thread_data: Value,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SharedThread {
    pub const LIFETIME_DAYS: i64 = 30;

    /// Snapshot `thread_data` under a fresh share id
    pub fn new(thread_id: impl Into<String>, thread_data: Value, now: DateTime<Utc>) -> Self {
        Self {
            share_id: uuid::Uuid::new_v4().to_string(),
            thread_id: thread_id.into(),
            thread_data,
            created_at: now,
            expires_at: now + Duration::days(Self::LIFETIME_DAYS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}
