use crate::error::{AppError, AppResult};
use crate::proxy::config::UpstreamProxyConfig;
use reqwest::{Client, Proxy};

/// Create an HTTP client with the given timeout and optional upstream proxy
pub fn create_client_with_proxy(
    timeout_secs: u64,
    proxy_config: Option<&UpstreamProxyConfig>,
) -> AppResult<Client> {
    let mut builder = Client::builder().timeout(std::time::Duration::from_secs(timeout_secs));

    if let Some(config) = proxy_config {
        if config.enabled && !config.url.is_empty() {
            match Proxy::all(&config.url) {
                Ok(proxy) => {
                    builder = builder.proxy(proxy);
                    tracing::info!("HTTP client upstream proxy enabled: {}", config.url);
                }
                Err(e) => {
                    tracing::error!("Invalid proxy address: {}, error: {}", config.url, e);
                }
            }
        }
    }

    builder
        .build()
        .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_proxy_falls_back_to_direct_client() {
        let config = UpstreamProxyConfig {
            enabled: true,
            url: "not a proxy url".to_string(),
        };
        assert!(create_client_with_proxy(5, Some(&config)).is_ok());
    }

    #[test]
    fn test_disabled_proxy_is_ignored() {
        let config = UpstreamProxyConfig {
            enabled: false,
            url: "socks5://127.0.0.1:1080".to_string(),
        };
        assert!(create_client_with_proxy(5, Some(&config)).is_ok());
        assert!(create_client_with_proxy(5, None).is_ok());
    }
}
