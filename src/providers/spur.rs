//! Spur Context API provider.

use super::{ContextProvider, ProviderError, UpstreamResponse};
use crate::config::{ApiVersion, Config};
use crate::error::TransportSetupError;
use crate::transport::TransportConfig;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, trace};

/// Spur Context API provider.
pub struct SpurProvider {
    client: Client,
    base_url: Url,
    api_version: ApiVersion,
}

impl SpurProvider {
    /// Create a provider whose HTTP client is built from the transport settings.
    pub fn new(
        transport: &TransportConfig,
        base_url: &str,
        api_version: ApiVersion,
    ) -> Result<Self, TransportSetupError> {
        let client = transport.build_client()?;
        Self::with_client(client, base_url, api_version)
    }

    /// Create a provider around an existing client.
    pub fn with_client(
        client: Client,
        base_url: &str,
        api_version: ApiVersion,
    ) -> Result<Self, TransportSetupError> {
        let invalid = |reason: String| TransportSetupError::BaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(invalid("cannot carry a path".to_string()));
        }

        Ok(Self {
            client,
            base_url: url,
            api_version,
        })
    }

    /// Create a provider from a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, TransportSetupError> {
        let transport = TransportConfig::from_request_config(&config.request)?;
        debug!(transport = ?transport, "Transport configured");
        Self::new(
            &transport,
            &config.settings.base_url,
            config.settings.api_version,
        )
    }

    /// The address is appended as a single percent-encoded path segment.
    fn context_url(&self, address: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend([self.api_version.as_str(), "context", address]);
        }
        url
    }
}

#[async_trait]
impl ContextProvider for SpurProvider {
    async fn fetch(&self, address: &str, api_key: &str) -> Result<UpstreamResponse, ProviderError> {
        let url = self.context_url(address);
        trace!(method = "GET", url = %url, "Request options");

        let response = self
            .client
            .get(url)
            .header("token", api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        trace!(status, body = %text, "Context API response");

        Ok(UpstreamResponse::new(status, parse_body(&text)))
    }

    fn name(&self) -> &str {
        "spur"
    }

    fn api_version(&self) -> ApiVersion {
        self.api_version
    }
}

/// Empty and non-JSON bodies carry no data.
fn parse_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(error = %e, "Discarding non-JSON response body");
            None
        }
    }
}
