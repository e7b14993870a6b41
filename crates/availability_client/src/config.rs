use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;

use crate::types::ClientError;

/// Endpoint path used when the API runs on the local machine
pub const LOCAL_ENDPOINT_PATH: &str = "/check_availability";

/// Endpoint path used by the hosted deployment
pub const HOSTED_ENDPOINT_PATH: &str = "/api/check_availability";

/// Which of the two endpoint paths to call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointMode {
    /// Development server on a loopback host
    Local,
    /// Hosted deployment behind the `/api` prefix
    Hosted,
}

impl EndpointMode {
    /// Path of the availability endpoint for this mode
    pub fn path(self) -> &'static str {
        match self {
            EndpointMode::Local => LOCAL_ENDPOINT_PATH,
            EndpointMode::Hosted => HOSTED_ENDPOINT_PATH,
        }
    }

    /// Local for `localhost` and loopback addresses, hosted otherwise
    pub fn for_url(url: &Url) -> Self {
        let is_loopback = url.host_str().is_some_and(|host| {
            host.eq_ignore_ascii_case("localhost")
                || host
                    .trim_start_matches('[')
                    .trim_end_matches(']')
                    .parse::<IpAddr>()
                    .is_ok_and(|ip| ip.is_loopback())
        });

        if is_loopback {
            EndpointMode::Local
        } else {
            EndpointMode::Hosted
        }
    }
}

impl FromStr for EndpointMode {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(EndpointMode::Local),
            "api" | "hosted" => Ok(EndpointMode::Hosted),
            other => Err(ClientError::Config(format!(
                "Unknown endpoint mode '{}', expected 'local' or 'api'",
                other
            ))),
        }
    }
}

/// Configuration for the availability client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin the endpoint path is resolved against (default: http://127.0.0.1:5000)
    pub base_url: String,

    /// Explicit endpoint mode; detected from the base URL when unset
    pub endpoint_mode: Option<EndpointMode>,

    /// Request timeout (default: 30 seconds)
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            endpoint_mode: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Resolves the full endpoint URL and the mode it was resolved with
    pub fn resolve_endpoint(&self) -> Result<(Url, EndpointMode), ClientError> {
        let base = Url::parse(&self.base_url).map_err(|e| {
            ClientError::Config(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;

        let mode = self
            .endpoint_mode
            .unwrap_or_else(|| EndpointMode::for_url(&base));

        let endpoint = base.join(mode.path()).map_err(|e| {
            ClientError::Config(format!("Invalid endpoint for '{}': {}", self.base_url, e))
        })?;

        Ok((endpoint, mode))
    }
}
