use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use availability_client::{ClientConfig, EndpointMode};
use directories::ProjectDirs;
use persistence::DEFAULT_TTL_DAYS;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "campsite";
const APP_NAME: &str = "Campsite";
const STATE_FILENAME: &str = "form_state.json";

/// Runtime configuration read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Origin of the availability API (`CAMPSITE_API_URL`)
    pub api_url: String,

    /// Endpoint path override (`CAMPSITE_ENDPOINT`: local or api)
    pub endpoint_mode: Option<EndpointMode>,

    /// Saved form state (`CAMPSITE_STATE_FILE`)
    pub state_file: PathBuf,

    /// Catalog JSON replacing the built-in one (`CAMPSITE_CATALOG_FILE`)
    pub catalog_file: Option<PathBuf>,

    /// Days a saved value is kept (`CAMPSITE_PERSIST_DAYS`)
    pub persist_days: u32,

    /// Request timeout (`CAMPSITE_HTTP_TIMEOUT_SECS`)
    pub http_timeout: Duration,
}

impl AppConfig {
    /// Reads the configuration from process environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let client_defaults = ClientConfig::default();

        let endpoint_mode = get("CAMPSITE_ENDPOINT")
            .map(|value| EndpointMode::from_str(&value))
            .transpose()
            .context("Invalid CAMPSITE_ENDPOINT")?;

        let persist_days = parse_number(get("CAMPSITE_PERSIST_DAYS"), "CAMPSITE_PERSIST_DAYS")?
            .unwrap_or(DEFAULT_TTL_DAYS);

        let http_timeout = parse_number(
            get("CAMPSITE_HTTP_TIMEOUT_SECS"),
            "CAMPSITE_HTTP_TIMEOUT_SECS",
        )?
        .map(Duration::from_secs)
        .unwrap_or(client_defaults.timeout);

        Ok(Self {
            api_url: get("CAMPSITE_API_URL").unwrap_or(client_defaults.base_url),
            endpoint_mode,
            state_file: get("CAMPSITE_STATE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(default_state_file),
            catalog_file: get("CAMPSITE_CATALOG_FILE").map(PathBuf::from),
            persist_days,
            http_timeout,
        })
    }

    /// Settings for the availability client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            endpoint_mode: self.endpoint_mode,
            timeout: self.http_timeout,
        }
    }
}

fn parse_number<T: FromStr>(value: Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .with_context(|| format!("Invalid {} '{}'", key, value))
        })
        .transpose()
}

/// Platform data directory, or the working directory when it cannot be determined
fn default_state_file() -> PathBuf {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.data_dir().join(STATE_FILENAME))
        .unwrap_or_else(|| {
            log::warn!("⚠️ Could not determine data directory, saving form state locally");
            PathBuf::from(STATE_FILENAME)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.api_url, "http://127.0.0.1:5000");
        assert_eq!(config.endpoint_mode, None);
        assert_eq!(config.catalog_file, None);
        assert_eq!(config.persist_days, 30);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(config.state_file.ends_with(STATE_FILENAME));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("CAMPSITE_API_URL", "https://camping.example.com"),
            ("CAMPSITE_ENDPOINT", "local"),
            ("CAMPSITE_STATE_FILE", "/tmp/state.json"),
            ("CAMPSITE_CATALOG_FILE", "/tmp/catalog.json"),
            ("CAMPSITE_PERSIST_DAYS", "7"),
            ("CAMPSITE_HTTP_TIMEOUT_SECS", " 5 "),
        ])
        .unwrap();

        assert_eq!(config.endpoint_mode, Some(EndpointMode::Local));
        assert_eq!(config.state_file, PathBuf::from("/tmp/state.json"));
        assert_eq!(config.catalog_file, Some(PathBuf::from("/tmp/catalog.json")));
        assert_eq!(config.persist_days, 7);

        let client = config.client_config();
        assert_eq!(client.base_url, "https://camping.example.com");
        assert_eq!(client.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config(&[("CAMPSITE_API_URL", "  "), ("CAMPSITE_ENDPOINT", "")]).unwrap();

        assert_eq!(config.api_url, "http://127.0.0.1:5000");
        assert_eq!(config.endpoint_mode, None);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config(&[("CAMPSITE_PERSIST_DAYS", "a month")]).is_err());
        assert!(config(&[("CAMPSITE_HTTP_TIMEOUT_SECS", "-1")]).is_err());
        assert!(config(&[("CAMPSITE_ENDPOINT", "staging")]).is_err());
    }
}
