// Identity provider lookup for bearer tokens

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::auth_client::{AuthClient, StaticToken};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

pub struct IdentityClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl IdentityClient {
    pub fn new(http_client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn user_url(&self) -> String {
        format!("{}/auth/v1/user", self.base_url)
    }

    /// Resolve the user behind `token`; `Ok(None)` when the provider rejects it
    pub async fn get_user(&self, token: &str) -> AppResult<Option<IdentityUser>> {
        let client = AuthClient::new(self.http_client.clone(), StaticToken::new(token));
        let mut request = client.get(&self.user_url()).await;
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_client_error() {
            tracing::info!("Identity provider rejected token: {}", status);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Identity provider returned {}",
                status
            )));
        }

        Ok(Some(response.json::<IdentityUser>().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_url() {
        let client = IdentityClient::new(Client::new(), "https://id.example.com/", None);
        assert_eq!(client.user_url(), "https://id.example.com/auth/v1/user");
    }

    #[test]
    fn test_user_without_email() {
        let user: IdentityUser = serde_json::from_str(r#"{"id": "u-1", "aud": "x"}"#).unwrap();
        assert_eq!(user.id, "u-1");
        assert!(user.email.is_none());
    }
}
