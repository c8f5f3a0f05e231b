// Upstream client for the agent-execution server

use bytes::Bytes;
use reqwest::{header::HeaderMap, Client, Method, Response};
use serde::Serialize;

use crate::error::AppResult;
use crate::proxy::config::ProxyConfig;
use crate::utils::http::create_client_with_proxy;

pub struct UpstreamClient {
    http_client: Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(config: &ProxyConfig) -> AppResult<Self> {
        let http_client =
            create_client_with_proxy(config.request_timeout, Some(&config.upstream_proxy))?;
        Ok(Self::with_client(http_client, config.backend_base()))
    }

    pub fn with_client(http_client: Client, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    /// Backend origin + `/` + path. The path is used exactly as given.
    pub fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Replay a request against the backend. Exactly one attempt is made.
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> AppResult<Response> {
        let url = self.build_url(path);

        let mut request = self.http_client.request(method, &url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        Ok(request.send().await?)
    }

    /// POST a JSON document to an arbitrary URL
    pub async fn post_json<T: Serialize + ?Sized>(&self, url: &str, payload: &T) -> AppResult<Response> {
        Ok(self.http_client.post(url).json(payload).send().await?)
    }
}
