//! # HTTP Transport
//!
//! [`HttpClient`] is the production [`Client`]: a thin `reqwest` wrapper that
//! joins relative Redfish URIs onto the service endpoint, authenticates with
//! HTTP basic auth and turns non-success statuses into
//! [`TransportError::Status`].
//!
//! ## Configuration
//!
//! [`ClientConfig`] can be built in code or read from the environment:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `REDFISH_ENDPOINT` | Service base URL, e.g. `https://10.0.0.5` (required) |
//! | `REDFISH_USERNAME` / `REDFISH_PASSWORD` | Basic auth credentials |
//! | `REDFISH_INSECURE` | `true`/`1` to accept invalid TLS certificates |
//! | `REDFISH_TIMEOUT_SECS` | Per-request timeout (default 30) |

use crate::client::{Body, Client, ClientHandle, Response};
use crate::error::{status_message, TransportError};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for an [`HttpClient`].
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub insecure: bool,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: None,
            password: None,
            insecure: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Accept self-signed or otherwise invalid certificates. BMCs often ship with one.
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads the `REDFISH_*` variables described in the module docs.
    pub fn from_env() -> Result<Self, TransportError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TransportError> {
        let endpoint = lookup("REDFISH_ENDPOINT")
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| TransportError::InvalidConfig("REDFISH_ENDPOINT is not set".into()))?;

        let mut config = Self::new(endpoint);
        config.username = lookup("REDFISH_USERNAME");
        config.password = lookup("REDFISH_PASSWORD");
        config.insecure = lookup("REDFISH_INSECURE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        if let Some(secs) = lookup("REDFISH_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                TransportError::InvalidConfig(format!("REDFISH_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("insecure", &self.insecure)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// `reqwest`-backed Redfish transport.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        if config.endpoint.trim().is_empty() {
            return Err(TransportError::InvalidConfig("endpoint is empty".into()));
        }

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::InvalidConfig(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Builds a client and wraps it as a shared handle.
    pub fn connect(config: ClientConfig) -> Result<ClientHandle, TransportError> {
        Ok(Arc::new(Self::new(config)?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for `uri`. Absolute URIs pass through untouched.
    pub fn url(&self, uri: &str) -> String {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return uri.to_string();
        }
        format!(
            "{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            uri.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Client for HttpClient {
    #[instrument(skip(self))]
    async fn get(&self, uri: &str) -> Result<Response, TransportError> {
        let url = self.url(uri);
        debug!(%url, "Sending request");

        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(username) = &self.config.username {
            request = request.basic_auth(username, self.config.password.as_ref());
        }

        let response = request.send().await.map_err(|e| TransportError::Request {
            uri: uri.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| TransportError::Body {
            uri: uri.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(TransportError::Status {
                uri: uri.to_string(),
                status: status.as_u16(),
                message: status_message(status.as_u16(), &bytes),
            });
        }

        Ok(Response::new(status.as_u16(), Body::from_bytes(bytes.to_vec())))
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_from_env_requires_endpoint() {
        let result = ClientConfig::from_lookup(lookup(&[("REDFISH_USERNAME", "root")]));
        match result {
            Err(TransportError::InvalidConfig(msg)) => assert!(msg.contains("REDFISH_ENDPOINT")),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_config_from_env_reads_all_fields() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("REDFISH_ENDPOINT", "https://bmc.local"),
            ("REDFISH_USERNAME", "root"),
            ("REDFISH_PASSWORD", "calvin"),
            ("REDFISH_INSECURE", "True"),
            ("REDFISH_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(
            config,
            ClientConfig::new("https://bmc.local")
                .with_basic_auth("root", "calvin")
                .insecure(true)
                .with_timeout(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_config_rejects_bad_timeout() {
        let result = ClientConfig::from_lookup(lookup(&[
            ("REDFISH_ENDPOINT", "https://bmc.local"),
            ("REDFISH_TIMEOUT_SECS", "soon"),
        ]));
        assert!(matches!(result, Err(TransportError::InvalidConfig(_))));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ClientConfig::new("https://bmc.local").with_basic_auth("root", "calvin");
        let text = format!("{:?}", config);
        assert!(text.contains("[REDACTED]"));
        assert!(!text.contains("calvin"));
    }

    #[test]
    fn test_url_joins_relative_uris() {
        let client = HttpClient::new(ClientConfig::new("https://bmc.local/")).unwrap();
        assert_eq!(client.url("/redfish/v1"), "https://bmc.local/redfish/v1");
        assert_eq!(client.url("redfish/v1"), "https://bmc.local/redfish/v1");
        assert_eq!(
            client.url("https://other.local/redfish/v1"),
            "https://other.local/redfish/v1"
        );
    }

    #[test]
    fn test_empty_endpoint_is_rejected() {
        assert!(matches!(
            HttpClient::new(ClientConfig::new("  ")),
            Err(TransportError::InvalidConfig(_))
        ));
    }
}
