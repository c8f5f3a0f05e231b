pub mod bug_report;
pub mod config;
pub mod share;

pub use bug_report::{BugReport, MessageHistory, WebhookPayload};
pub use config::{AppConfig, BugReportConfig, IdentityConfig};
pub use share::SharedThread;
