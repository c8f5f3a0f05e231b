// HTTP client wrapper that attaches credentials from an injected provider

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder};

/// Source of the bearer token attached to outbound calls
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Option<String>;
}

/// A token already known up front, e.g. taken from an inbound request
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn bearer_token(&self) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.clone())
        }
    }
}

/// Builds requests carrying `Authorization: Bearer <token>` (when the provider
/// has one) and `X-Api-Key` (when configured)
pub struct AuthClient<P> {
    http_client: Client,
    token_provider: P,
    api_key: Option<String>,
}

impl<P: TokenProvider> AuthClient<P> {
    pub fn new(http_client: Client, token_provider: P) -> Self {
        Self {
            http_client,
            token_provider,
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    pub async fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut builder = self.http_client.request(method, url);

        if let Some(key) = &self.api_key {
            builder = builder.header("X-Api-Key", key);
        }

        match self.token_provider.bearer_token().await {
            Some(token) => {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            None => tracing::debug!("AuthClient: no token available for {}", url),
        }

        builder
    }

    pub async fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url).await
    }
}
