//! Error taxonomy for payment provider interactions.

use thiserror::Error;

/// Errors from payment provider operations.
///
/// Nothing in this taxonomy is retried automatically; the only retry
/// behavior in the system is provider-initiated webhook redelivery, governed
/// by the HTTP acknowledgement status.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Missing or malformed caller input.
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Webhook authentication failed. Processing stops here.
    #[error("Webhook verification failed: {0}")]
    Verification(String),

    /// The provider call failed at the HTTP level or returned an error
    /// payload.
    #[error("Provider call failed ({}): {detail}", status.map(|s| s.to_string()).unwrap_or_else(|| "no status".to_string()))]
    Gateway { status: Option<u16>, detail: String },

    /// The transport succeeded but the semantic payload is unusable
    /// (undecodable body, missing redirect URL).
    #[error("Unusable provider response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn verification(reason: impl Into<String>) -> Self {
        Self::Verification(reason.into())
    }

    pub fn gateway(status: Option<u16>, detail: impl Into<String>) -> Self {
        Self::Gateway {
            status,
            detail: detail.into(),
        }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedResponse(detail.into())
    }
}
