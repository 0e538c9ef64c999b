//! Payment provider port for external payment gateways.
//!
//! Defines the contract both gateway integrations (Stripe, Bictorys)
//! implement. The application layer drives checkout creation and webhook
//! processing exclusively through this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::donation::PaymentMethod;
use crate::domain::payment::{DonationIntent, PaymentOutcome, ProviderError};

/// Port for payment provider integrations.
///
/// Each implementation owns the full provider-specific lifecycle: building
/// the session request, calling the gateway, authenticating webhook
/// deliveries, and classifying events into canonical outcomes.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Payment rail this provider settles on.
    fn method(&self) -> PaymentMethod;

    /// Create a hosted checkout session for the given intent.
    ///
    /// Validates the intent, calls the gateway, and returns the redirect
    /// URL the frontend sends the donor to.
    async fn create_session(
        &self,
        intent: &DonationIntent,
    ) -> Result<CheckoutSession, ProviderError>;

    /// Authenticate a webhook delivery over the exact raw body bytes.
    ///
    /// `signature` carries the provider's authentication header, if the
    /// request had one. Must be called before any structured parsing of
    /// the payload.
    fn verify_event(&self, payload: &[u8], signature: Option<&str>) -> Result<(), ProviderError>;

    /// Classify a verified webhook payload into a canonical outcome.
    ///
    /// Unrecognized event types map to [`PaymentOutcome::Ignored`];
    /// an undecodable body is the only error case.
    fn classify_event(&self, payload: &[u8]) -> Result<PaymentOutcome, ProviderError>;
}

/// A created hosted-checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// URL the donor is redirected to.
    pub checkout_url: String,

    /// Provider session/transaction identifier, when the provider
    /// returned one.
    pub transaction_id: Option<String>,
}
