//! Request and response DTOs for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::domain::payment::{DonationIntent, ProviderError};

/// Request body for checkout-session creation, both providers.
///
/// Fields are optional at the wire level so that missing values surface as
/// 400 validation errors rather than body-decode rejections.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    pub amount: Option<f64>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,

    #[serde(default)]
    pub is_anonymous: bool,

    #[serde(default)]
    pub accept_newsletter: bool,
}

impl CreateCheckoutRequest {
    /// Convert to a donation intent, rejecting absent required fields.
    pub fn into_intent(self) -> Result<DonationIntent, ProviderError> {
        let amount = self
            .amount
            .ok_or_else(|| ProviderError::validation("amount", "is required"))?;
        let email = self
            .email
            .ok_or_else(|| ProviderError::validation("email", "is required"))?;

        Ok(DonationIntent {
            amount,
            email,
            name: self.name,
            phone: self.phone,
            is_anonymous: self.is_anonymous,
            accept_newsletter: self.accept_newsletter,
        })
    }
}

/// Response for a created checkout session.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    /// Provider session/transaction identifier, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Redirect URL for the donor's browser.
    pub url: String,
}

/// Request body for contact-form intake.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// Response for a stored contact message.
#[derive(Debug, Clone, Serialize)]
pub struct ContactResponse {
    pub id: uuid::Uuid,
    pub status: String,
}

/// Liveness message for `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

/// Health probe payload for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
