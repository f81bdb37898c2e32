//! Upstream context providers.

pub mod spur;

use crate::config::ApiVersion;
use async_trait::async_trait;
use serde_json::Value;

/// Raw answer from the upstream API.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: u16,

    /// Parsed JSON body. `None` if the body was empty or not JSON.
    pub body: Option<Value>,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    /// Upstream status message (`query_status`), if the body carries one.
    pub fn query_status(&self) -> Option<String> {
        self.body
            .as_ref()?
            .get("query_status")?
            .as_str()
            .map(str::to_string)
    }
}

/// Error from a provider before any response was received.
#[derive(Debug)]
pub enum ProviderError {
    /// HTTP request failed.
    Http(reqwest::Error),
    /// Timeout.
    Timeout,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Http(e) => write!(f, "HTTP error: {}", e),
            ProviderError::Timeout => write!(f, "Request timed out"),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Http(e)
        }
    }
}

/// Source of per-address context.
///
/// One call is one network round-trip; implementations must not retry or cache.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Fetch context for a single address.
    async fn fetch(&self, address: &str, api_key: &str) -> Result<UpstreamResponse, ProviderError>;

    /// Provider name for logging.
    fn name(&self) -> &str;

    /// API version whose response shape this provider returns.
    fn api_version(&self) -> ApiVersion;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_status() {
        let response = UpstreamResponse::new(403, Some(json!({"query_status": "BAD_TOKEN"})));
        assert_eq!(response.query_status().as_deref(), Some("BAD_TOKEN"));

        let response = UpstreamResponse::new(403, Some(json!({"query_status": 7})));
        assert_eq!(response.query_status(), None);

        let response = UpstreamResponse::new(403, None);
        assert_eq!(response.query_status(), None);
    }

    #[test]
    fn test_provider_error_display() {
        assert_eq!(ProviderError::Timeout.to_string(), "Request timed out");
    }
}
