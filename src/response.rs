//! Classification of upstream responses into lookup outcomes.

use crate::error::LookupError;
use crate::providers::{ProviderError, UpstreamResponse};
use serde_json::Value;

/// Successful classification of a response.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    /// Status 200 with a usable body.
    Data(Value),
    /// Status 200 with an empty or absent body.
    Empty,
}

/// Failed classification, with the upstream status message when one was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFailure {
    pub error: LookupError,
    pub detail: Option<String>,
}

impl LookupFailure {
    fn new(error: LookupError, detail: Option<String>) -> Self {
        Self { error, detail }
    }
}

/// Map a transport result onto the outcome taxonomy.
pub fn classify(result: Result<UpstreamResponse, ProviderError>) -> Result<Classified, LookupFailure> {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            return Err(LookupFailure::new(
                LookupError::Transport(e.to_string()),
                Some("HTTP Request Error".to_string()),
            ))
        }
    };

    let query_status = response.query_status();
    match response.status {
        200 => match response.body {
            Some(body) if !is_empty_body(&body) => Ok(Classified::Data(body)),
            _ => Ok(Classified::Empty),
        },
        400 => Err(LookupFailure::new(LookupError::PrivateAddressRejected, query_status)),
        403 => Err(LookupFailure::new(LookupError::InvalidCredential, query_status)),
        404 => Err(LookupFailure::new(LookupError::AddressNotFound, query_status)),
        429 => Err(LookupFailure::new(LookupError::QuotaExceeded, query_status)),
        code => Err(LookupFailure::new(
            LookupError::UnexpectedStatus { code },
            Some("An unexpected error occurred".to_string()),
        )),
    }
}

/// Null, empty strings and empty arrays carry no data. Objects always do.
fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
