use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::models::AppConfig;

const DATA_DIR: &str = ".agent_gateway";
const CONFIG_FILE: &str = "gateway_config.json";

pub const ENV_DATA_DIR: &str = "AGENT_GATEWAY_DATA_DIR";
pub const ENV_BACKEND_URL: &str = "LANGGRAPH_API_URL";
pub const ENV_BACKEND_API_KEY: &str = "LANGGRAPH_API_KEY";
pub const ENV_WEBHOOK_URL: &str = "BUG_REPORT_WEBHOOK_URL";
pub const ENV_PUBLIC_WEBHOOK_URL: &str = "NEXT_PUBLIC_BUG_REPORT_WEBHOOK_URL";
pub const ENV_IDENTITY_URL: &str = "IDENTITY_URL";
pub const ENV_IDENTITY_API_KEY: &str = "IDENTITY_API_KEY";
pub const ENV_PORT: &str = "GATEWAY_PORT";

/// Get data directory path, creating it when missing
pub fn get_data_dir() -> AppResult<PathBuf> {
    let data_dir = match std::env::var(ENV_DATA_DIR) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .ok_or_else(|| AppError::Config("Failed to get user home directory".to_string()))?
            .join(DATA_DIR),
    };

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }

    Ok(data_dir)
}

/// Load application config from the data directory and apply environment overrides
pub fn load_app_config() -> AppResult<AppConfig> {
    let data_dir = get_data_dir()?;
    let mut config = load_app_config_from(&data_dir)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config)?;
    Ok(config)
}

/// Read `gateway_config.json` in `dir`; a default file is written on first run
pub fn load_app_config_from(dir: &Path) -> AppResult<AppConfig> {
    let config_path = dir.join(CONFIG_FILE);

    if !config_path.exists() {
        let config = AppConfig::new();
        save_app_config_to(dir, &config)?;
        tracing::info!("Wrote default config to {:?}", config_path);
        return Ok(config);
    }

    let content = fs::read_to_string(&config_path)?;
    serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse config file: {}", e)))
}

/// Save application config
pub fn save_app_config_to(dir: &Path, config: &AppConfig) -> AppResult<()> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(dir.join(CONFIG_FILE), content)?;
    Ok(())
}

/// Environment values win over the config file. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_BACKEND_URL) {
        config.proxy.backend_url = url;
    }
    if let Some(key) = get(ENV_BACKEND_API_KEY) {
        config.proxy.api_key = Some(key);
    }
    if let Some(port) = get(ENV_PORT) {
        match port.parse() {
            Ok(port) => config.proxy.port = port,
            Err(_) => tracing::warn!("Ignoring invalid {}: {}", ENV_PORT, port),
        }
    }
    if let Some(url) = get(ENV_WEBHOOK_URL).or_else(|| get(ENV_PUBLIC_WEBHOOK_URL)) {
        config.bug_report.webhook_url = Some(url);
    }
    if let Some(url) = get(ENV_IDENTITY_URL) {
        config.identity.url = Some(url);
    }
    if let Some(key) = get(ENV_IDENTITY_API_KEY) {
        config.identity.api_key = Some(key);
    }
}

pub fn validate_config(config: &AppConfig) -> AppResult<()> {
    check_url("proxy.backend_url", &config.proxy.backend_url)?;
    if let Some(url) = &config.proxy.public_base_url {
        check_url("proxy.public_base_url", url)?;
    }
    if let Some(url) = &config.bug_report.webhook_url {
        check_url("bug_report.webhook_url", url)?;
    }
    if let Some(url) = &config.identity.url {
        check_url("identity.url", url)?;
    }
    if config.proxy.request_timeout == 0 {
        return Err(AppError::Config(
            "proxy.request_timeout must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn check_url(field: &str, value: &str) -> AppResult<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| AppError::Config(format!("{} is not a valid URL ({}): {}", field, e, value)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AppError::Config(format!(
            "{} must use http or https, got {}",
            field, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_apply() {
        let mut config = AppConfig::new();
        apply_env_overrides(
            &mut config,
            env(&[
                (ENV_BACKEND_URL, "http://agents:9000"),
                (ENV_PORT, "8088"),
                (ENV_IDENTITY_URL, "https://id.example.com"),
                (ENV_IDENTITY_API_KEY, "anon"),
            ]),
        );

        assert_eq!(config.proxy.backend_url, "http://agents:9000");
        assert_eq!(config.proxy.port, 8088);
        assert_eq!(config.identity.url.as_deref(), Some("https://id.example.com"));
        assert_eq!(config.identity.api_key.as_deref(), Some("anon"));
    }

    #[test]
    fn test_private_webhook_wins_over_public() {
        let mut config = AppConfig::new();
        apply_env_overrides(
            &mut config,
            env(&[
                (ENV_PUBLIC_WEBHOOK_URL, "https://public.example.com/hook"),
                (ENV_WEBHOOK_URL, "https://private.example.com/hook"),
            ]),
        );
        assert_eq!(
            config.bug_report.webhook_url.as_deref(),
            Some("https://private.example.com/hook")
        );

        let mut config = AppConfig::new();
        apply_env_overrides(
            &mut config,
            env(&[
                (ENV_WEBHOOK_URL, "  "),
                (ENV_PUBLIC_WEBHOOK_URL, "https://public.example.com/hook"),
            ]),
        );
        assert_eq!(
            config.bug_report.webhook_url.as_deref(),
            Some("https://public.example.com/hook")
        );
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = AppConfig::new();
        apply_env_overrides(&mut config, env(&[(ENV_PORT, "eighty")]));
        assert_eq!(config.proxy.port, 3000);
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = AppConfig::new();
        assert!(validate_config(&config).is_ok());

        config.proxy.backend_url = "localhost:2024/no-scheme".to_string();
        assert!(validate_config(&config).is_err());

        config.proxy.backend_url = "ftp://localhost:2024".to_string();
        assert!(validate_config(&config).is_err());

        config.proxy.backend_url = "http://localhost:2024".to_string();
        config.bug_report.webhook_url = Some("not a url".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_writes_default_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();

        let first = load_app_config_from(dir.path()).unwrap();
        assert!(dir.path().join(CONFIG_FILE).exists());
        assert_eq!(first.proxy.port, 3000);

        let mut changed = first.clone();
        changed.proxy.backend_url = "http://10.0.0.5:2024".to_string();
        save_app_config_to(dir.path(), &changed).unwrap();

        let reloaded = load_app_config_from(dir.path()).unwrap();
        assert_eq!(reloaded.proxy.backend_url, "http://10.0.0.5:2024");
    }

    #[test]
    fn test_corrupt_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        assert!(matches!(
            load_app_config_from(dir.path()),
            Err(AppError::Config(_))
        ));
    }
}
