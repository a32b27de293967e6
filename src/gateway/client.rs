//! Shared HTTP plumbing for the catalog gateways.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ServerSettings;
use crate::error::{GatewayError, Result};

/// HTTP client bound to one catalog server.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `settings.base_url`.
    pub fn new(settings: &ServerSettings) -> Result<Self> {
        let url = settings.base_url.trim();
        if url.is_empty() {
            return Err(GatewayError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(GatewayError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .user_agent(format!("trackdeck/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: url,
        })
    }

    /// Client for `base_url` with default timeouts.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(&ServerSettings {
            base_url: base_url.into(),
            ..ServerSettings::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Decode a successful response as JSON; any other status becomes `Server`.
pub(crate) async fn expect_json<T: DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Parse(format!("Failed to parse {what}: {e}")))
    } else {
        Err(server_error(response).await)
    }
}

/// Accept any success status, discarding the body.
pub(crate) async fn expect_success(response: Response) -> Result<()> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(server_error(response).await)
    }
}

pub(crate) async fn server_error(response: Response) -> GatewayError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    debug!(status, message = %message, "Server returned error");
    GatewayError::Server { status, message }
}
