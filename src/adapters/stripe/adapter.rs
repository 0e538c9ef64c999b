//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Stripe Checkout API.
//! Handles session creation, webhook signature verification, and event
//! classification.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Timestamp validation (5-minute window) for replay attack prevention
//! - Secrets handled via `secrecy::SecretString`

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::donation::PaymentMethod;
use crate::domain::payment::signature::WebhookVerifier;
use crate::domain::payment::{DonationIntent, PaymentOutcome, ProviderError, SucceededPayment};
use crate::ports::{CheckoutSession, PaymentProvider};

use super::types::{
    StripeCheckoutSessionResponse, StripeErrorResponse, StripeSessionObject, StripeWebhookEvent,
};

/// Bound on the outbound session-creation call. No retry on timeout;
/// retrying risks duplicate sessions.
const GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for the Stripe API.
    api_base_url: String,

    /// Frontend origin used to build redirect URLs (no trailing slash).
    frontend_url: String,
}

impl StripeConfig {
    pub fn new(
        api_key: impl Into<String>,
        webhook_secret: impl Into<String>,
        frontend_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            frontend_url: frontend_url.into(),
        }
    }
}

/// Stripe payment provider adapter.
pub struct StripeAdapter {
    config: StripeConfig,
    verifier: WebhookVerifier,
    http_client: reqwest::Client,
}

impl StripeAdapter {
    pub fn new(config: StripeConfig) -> Self {
        let verifier = WebhookVerifier::new(config.webhook_secret.expose_secret());
        let http_client = reqwest::Client::builder()
            .timeout(GATEWAY_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            verifier,
            http_client,
        }
    }

    /// Build the form-encoded checkout-session request.
    ///
    /// One line item priced in cents. The success URL carries no donation
    /// details; the webhook is the authoritative signal path for cards.
    fn build_session_params(&self, intent: &DonationIntent) -> Vec<(&'static str, String)> {
        let unit_amount = (intent.amount * 100.0).round() as i64;

        vec![
            ("mode", "payment".to_string()),
            ("payment_method_types[0]", "card".to_string()),
            ("customer_email", intent.email.clone()),
            (
                "line_items[0][price_data][currency]",
                "eur".to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                "Don à SkyBlue".to_string(),
            ),
            (
                "line_items[0][price_data][product_data][description]",
                "Soutien aux orphelins".to_string(),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                unit_amount.to_string(),
            ),
            ("line_items[0][quantity]", "1".to_string()),
            (
                "success_url",
                format!("{}/don-success", self.config.frontend_url),
            ),
            (
                "cancel_url",
                format!("{}/faire-un-don", self.config.frontend_url),
            ),
            (
                "metadata[name]",
                intent.name.clone().unwrap_or_default(),
            ),
            ("metadata[isAnonymous]", intent.is_anonymous.to_string()),
            (
                "metadata[acceptNewsletter]",
                intent.accept_newsletter.to_string(),
            ),
        ]
    }

    /// Extract the provider's error message from a non-2xx body.
    fn error_detail(body: &str) -> String {
        match serde_json::from_str::<StripeErrorResponse>(body) {
            Ok(err) => err.error.message.unwrap_or_else(|| body.to_string()),
            Err(_) => body.to_string(),
        }
    }

    fn classify_completed_session(
        &self,
        object: serde_json::Value,
    ) -> Result<PaymentOutcome, ProviderError> {
        let session: StripeSessionObject = serde_json::from_value(object)
            .map_err(|e| ProviderError::malformed(format!("invalid checkout session: {}", e)))?;

        let amount_eur = session.amount_total.unwrap_or(0) as f64 / 100.0;

        let email = session
            .customer_details
            .and_then(|d| d.email)
            .unwrap_or_default();
        if email.is_empty() {
            tracing::warn!(session_id = %session.id, "Completed session without customer email");
        }

        let name = session
            .metadata
            .get("name")
            .filter(|n| !n.is_empty())
            .cloned();
        let is_anonymous = session.metadata.get("isAnonymous").map(String::as_str) == Some("true");
        let accept_newsletter =
            session.metadata.get("acceptNewsletter").map(String::as_str) == Some("true");

        Ok(PaymentOutcome::Succeeded(SucceededPayment {
            provider_ref: session.id,
            payment_ref: session.payment_intent,
            amount_eur,
            email,
            name,
            is_anonymous,
            accept_newsletter,
            method: PaymentMethod::Card,
            note: None,
        }))
    }
}

#[async_trait]
impl PaymentProvider for StripeAdapter {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Card
    }

    async fn create_session(
        &self,
        intent: &DonationIntent,
    ) -> Result<CheckoutSession, ProviderError> {
        intent.validate_amount()?;

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let params = self.build_session_params(intent);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::gateway(None, e.to_string()))?;

        let status = response.status();

        // Read raw text first; the provider can return malformed bodies
        // even on nominal transport success.
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::gateway(Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            let detail = Self::error_detail(&body);
            tracing::error!(status = %status, error = %detail, "Stripe session creation failed");
            return Err(ProviderError::gateway(Some(status.as_u16()), detail));
        }

        let session: StripeCheckoutSessionResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::malformed(format!("invalid session response: {}", e)))?;

        let checkout_url = session
            .url
            .ok_or_else(|| ProviderError::malformed("missing redirect URL"))?;

        tracing::info!(session_id = %session.id, "Stripe checkout session created");

        Ok(CheckoutSession {
            checkout_url,
            transaction_id: Some(session.id),
        })
    }

    fn verify_event(&self, payload: &[u8], signature: Option<&str>) -> Result<(), ProviderError> {
        let signature = signature
            .ok_or_else(|| ProviderError::verification("missing Stripe-Signature header"))?;

        self.verifier.verify(payload, signature)
    }

    fn classify_event(&self, payload: &[u8]) -> Result<PaymentOutcome, ProviderError> {
        let event: StripeWebhookEvent = serde_json::from_slice(payload)
            .map_err(|e| ProviderError::malformed(format!("invalid webhook payload: {}", e)))?;

        match event.event_type.as_str() {
            "checkout.session.completed" => self.classify_completed_session(event.data.object),
            other => {
                tracing::debug!(event_id = %event.id, event_type = %other, "Ignoring event");
                Ok(PaymentOutcome::Ignored)
            }
        }
    }
}
