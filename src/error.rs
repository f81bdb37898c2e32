//! Error types for configuration, transport setup and lookups.

use crate::model::Entity;
use std::fmt;
use thiserror::Error;

/// Why a single context lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Network, DNS or TLS failure before any response arrived.
    #[error("HTTP request error: {0}")]
    Transport(String),

    /// Upstream rejected the address as private (HTTP 400).
    #[error("specified IP is private")]
    PrivateAddressRejected,

    /// Upstream rejected the API token (HTTP 403).
    #[error("invalid token supplied")]
    InvalidCredential,

    /// Upstream has no record of the address (HTTP 404).
    #[error("IP address not found")]
    AddressNotFound,

    /// Account is out of query credits (HTTP 429).
    #[error("out of credits")]
    QuotaExceeded,

    /// Any other HTTP status.
    #[error("unexpected error (HTTP {code})")]
    UnexpectedStatus { code: u16 },
}

impl LookupError {
    /// HTTP status associated with this failure, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            LookupError::Transport(_) => None,
            LookupError::PrivateAddressRejected => Some(400),
            LookupError::InvalidCredential => Some(403),
            LookupError::AddressNotFound => Some(404),
            LookupError::QuotaExceeded => Some(429),
            LookupError::UnexpectedStatus { code } => Some(*code),
        }
    }
}

/// A batch aborted because one of its lookups failed.
///
/// Results already computed for other entities in the same batch are discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct BatchError {
    /// Entity whose lookup failed.
    pub entity: Entity,
    /// Failure kind.
    #[source]
    pub error: LookupError,
    /// Upstream-provided status message, if any.
    pub detail: Option<String>,
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lookup for {} failed: {}", self.entity.value, self.error)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

/// Ignore-list validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IgnoreListError {
    /// One or more tokens are not IPv4 addresses or CIDR ranges.
    #[error("invalid IP or CIDR range: {}", invalid_tokens.join(", "))]
    ConfigurationInvalid { invalid_tokens: Vec<String> },
}

/// A single configuration problem, keyed by the option it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionError {
    pub key: String,
    pub message: String,
}

impl OptionError {
    pub fn new(key: &str, message: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for OptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

/// Every problem found while validating a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ConfigErrors(pub Vec<OptionError>);

impl ConfigErrors {
    pub fn errors(&self) -> &[OptionError] {
        &self.0
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration")?;
        for (i, error) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, error)?;
        }
        Ok(())
    }
}

/// Failure while turning request settings into an HTTP client.
#[derive(Debug, Error)]
pub enum TransportSetupError {
    #[error("failed to read {what} from {path}: {source}")]
    Read {
        what: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {what}: {source}")]
    Tls {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("client certificate and private key must be configured together")]
    IncompleteIdentity,

    #[error("private key is encrypted but no passphrase is configured")]
    PassphraseRequired,

    #[error("failed to decrypt private key: {0}")]
    Decrypt(#[source] pkcs8::Error),

    #[error("invalid base URL {url}: {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("invalid proxy URL {url}: {source}")]
    Proxy {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
