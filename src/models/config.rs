use crate::proxy::ProxyConfig;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub bug_report: BugReportConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

/// Bug report relay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugReportConfig {
    /// Webhook receiving the report as JSON; reports are only logged when unset
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Address placed in the `to` field of the webhook payload
    #[serde(default = "default_recipient")]
    pub recipient: String,
}

/// Identity provider used by the token check endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IdentityConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_recipient() -> String {
    "bugs@localhost".to_string()
}

impl Default for BugReportConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            recipient: default_recipient(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            proxy: ProxyConfig::default(),
            bug_report: BugReportConfig::default(),
            identity: IdentityConfig::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}
