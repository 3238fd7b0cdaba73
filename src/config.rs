use std::{env, time::Duration};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use thiserror::Error;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Explicit settings handed to [`crate::mcp::client::McpClient`].
///
/// The endpoint is kept as the caller wrote it. Credentials embedded in the
/// URL path travel with it untouched.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub headers: HeaderMap,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
            headers: HeaderMap::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Settings the binary reads from the environment.
///
/// The access token is expected to be part of `MCP_SERVER_URL` already. It is
/// only sent as an `Authorization: Bearer` header when `MCP_BEARER_AUTH` is
/// `true` or `1`.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_url: String,
    pub access_token: Option<String>,
    pub bearer_auth: bool,
    pub timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MCP_SERVER_URL is required and must not be empty")]
    MissingServerUrl,
    #[error("MCP_TIMEOUT_SECS must be a positive integer")]
    InvalidTimeout,
    #[error("MCP_ACCESS_TOKEN contains characters not allowed in a header")]
    InvalidAccessToken,
    #[error("MCP_BEARER_AUTH must be true, false, 1 or 0")]
    InvalidBearerAuth,
    #[error("MCP_BEARER_AUTH is set but MCP_ACCESS_TOKEN is empty")]
    MissingAccessToken,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_url = env::var("MCP_SERVER_URL")
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingServerUrl)?;

        let access_token = env::var("MCP_ACCESS_TOKEN")
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        let bearer_auth = env::var("MCP_BEARER_AUTH")
            .ok()
            .map(|value| match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" | "" => Ok(false),
                _ => Err(ConfigError::InvalidBearerAuth),
            })
            .transpose()?
            .unwrap_or(false);

        let timeout = env::var("MCP_TIMEOUT_SECS")
            .ok()
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs)
                    .ok_or(ConfigError::InvalidTimeout)
            })
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT);

        let config = Self {
            server_url,
            access_token,
            bearer_auth,
            timeout,
        };

        let _ = config.client_config()?;
        Ok(config)
    }

    /// Builds the client settings, adding the bearer header only when opted in.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut client = ClientConfig::new(self.server_url.clone()).with_timeout(self.timeout);

        if self.bearer_auth {
            let token = self
                .access_token
                .as_deref()
                .ok_or(ConfigError::MissingAccessToken)?;
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ConfigError::InvalidAccessToken)?;
            value.set_sensitive(true);
            client = client.with_header(AUTHORIZATION, value);
        }

        Ok(client)
    }
}
