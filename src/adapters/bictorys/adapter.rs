//! Bictorys payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Bictorys charge API.
//! Amounts are converted to XOF for settlement; the persisted record stays
//! in EUR with the XOF amount retained as a note.
//!
//! Bictorys does not mandate webhook signatures. When a shared secret is
//! configured, inbound deliveries must carry it in the `X-Secret-Key`
//! header; without one, events are accepted as-is after shape validation.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::donation::currency::{eur_to_xof, xof_to_eur};
use crate::domain::donation::PaymentMethod;
use crate::domain::payment::signature::constant_time_compare;
use crate::domain::payment::{DonationIntent, PaymentOutcome, ProviderError, SucceededPayment};
use crate::ports::{CheckoutSession, PaymentProvider};

use super::types::{BictorysChargeRequest, BictorysCustomer};

/// Bound on the outbound charge-creation call. No retry on timeout;
/// retrying risks duplicate charges.
const GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Placeholder phone when the donor did not provide one; the charge API
/// requires a customer phone number.
const DEFAULT_PHONE: &str = "+221000000000";

/// Donor name used when the webhook carries none.
const ANONYMOUS_NAME: &str = "Anonyme";

/// Accepted success spellings for the webhook `status` field. Exact match;
/// case variants outside this set are not success.
const SUCCESS_STATUSES: &[&str] = &["succeeded", "success", "paid"];

/// Accepted failure spellings for the webhook `status` field.
const FAILURE_STATUSES: &[&str] = &["failed", "FAILED", "cancelled", "canceled"];

/// Redirect-URL field names tried in priority order; the response schema
/// is inconsistent release-to-release.
const REDIRECT_URL_FIELDS: &[&str] = &["link", "checkoutUrl", "checkout_url", "payment_url"];

/// Transaction-identifier field names tried in priority order.
const TRANSACTION_ID_FIELDS: &[&str] = &["id", "transactionId", "merchantReference", "reference"];

/// Bictorys API configuration.
#[derive(Clone)]
pub struct BictorysConfig {
    /// API key sent as `X-Api-Key` on charge creation.
    api_key: SecretString,

    /// Optional shared secret for webhook deliveries.
    webhook_secret: Option<SecretString>,

    /// Base URL for the Bictorys API.
    api_base_url: String,

    /// Frontend origin used to build redirect URLs (no trailing slash).
    frontend_url: String,
}

impl BictorysConfig {
    pub fn new(
        api_key: impl Into<String>,
        webhook_secret: Option<String>,
        api_base_url: impl Into<String>,
        frontend_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: webhook_secret.map(SecretString::new),
            api_base_url: api_base_url.into(),
            frontend_url: frontend_url.into(),
        }
    }
}

/// Bictorys payment provider adapter.
pub struct BictorysAdapter {
    config: BictorysConfig,
    http_client: reqwest::Client,
}

impl BictorysAdapter {
    pub fn new(config: BictorysConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(GATEWAY_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Build the charge request for the given intent.
    ///
    /// The success redirect embeds the donation details; for this provider
    /// the redirect is the primary signal path in degraded scenarios.
    fn build_charge_request(
        &self,
        intent: &DonationIntent,
    ) -> Result<BictorysChargeRequest, ProviderError> {
        let amount_xof = eur_to_xof(intent.amount);
        let seed = chrono::Utc::now().timestamp_millis();

        let mut success_url =
            reqwest::Url::parse(&format!("{}/don-success", self.config.frontend_url))
                .map_err(|e| ProviderError::validation("frontend_url", e.to_string()))?;
        success_url
            .query_pairs_mut()
            .append_pair("amount", &intent.amount.to_string())
            .append_pair("name", intent.name.as_deref().unwrap_or_default())
            .append_pair("email", &intent.email);

        Ok(BictorysChargeRequest {
            amount: amount_xof,
            currency: "XOF",
            payment_reference: format!("DON-{}", seed),
            merchant_reference: format!("SKYBLUE-{}", seed),
            success_redirect_url: success_url.to_string(),
            error_redirect_url: format!("{}/faire-un-don", self.config.frontend_url),
            customer: BictorysCustomer {
                name: intent.name.clone().unwrap_or_default(),
                phone: intent
                    .phone
                    .clone()
                    .filter(|p| !p.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_PHONE.to_string()),
                email: intent.email.clone(),
            },
        })
    }

    /// First string value among the given field names, in priority order.
    fn first_field<'a>(value: &'a serde_json::Value, fields: &[&str]) -> Option<&'a str> {
        fields.iter().find_map(|f| value.get(*f).and_then(|v| v.as_str()))
    }

    fn classify_succeeded(&self, payload: &serde_json::Value) -> PaymentOutcome {
        let amount_xof = payload
            .get("amount")
            .and_then(|v| v.as_f64())
            .map(|a| a.round() as i64)
            .unwrap_or(0);
        let amount_eur = xof_to_eur(amount_xof);

        let customer = payload.get("customer");
        let name = customer
            .and_then(|c| c.get("name"))
            .or_else(|| payload.get("name"))
            .and_then(|v| v.as_str())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(ANONYMOUS_NAME);
        let email = customer
            .and_then(|c| c.get("email"))
            .or_else(|| payload.get("email"))
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let provider_ref = Self::first_field(payload, TRANSACTION_ID_FIELDS)
            .map(String::from)
            .unwrap_or_else(|| format!("bictorys-{}", chrono::Utc::now().timestamp_millis()));

        PaymentOutcome::Succeeded(SucceededPayment {
            provider_ref,
            payment_ref: None,
            amount_eur,
            email: email.to_string(),
            name: Some(name.to_string()),
            is_anonymous: false,
            accept_newsletter: false,
            method: PaymentMethod::MobileMoney,
            note: Some(format!("Montant: {} XOF", amount_xof)),
        })
    }
}

#[async_trait]
impl PaymentProvider for BictorysAdapter {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::MobileMoney
    }

    async fn create_session(
        &self,
        intent: &DonationIntent,
    ) -> Result<CheckoutSession, ProviderError> {
        intent.validate_amount()?;
        intent.validate_contact()?;

        let url = format!("{}/pay/v1/charges", self.config.api_base_url);
        let request = self.build_charge_request(intent)?;

        let response = self
            .http_client
            .post(&url)
            .header("X-Api-Key", self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::gateway(None, e.to_string()))?;

        let status = response.status();

        // Raw text first; decode failure is distinct from transport failure.
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::gateway(Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            let detail = match serde_json::from_str::<serde_json::Value>(&body) {
                Ok(err) => err
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(String::from)
                    .unwrap_or(body),
                Err(_) => body,
            };
            tracing::error!(status = %status, error = %detail, "Bictorys charge creation failed");
            return Err(ProviderError::gateway(Some(status.as_u16()), detail));
        }

        let decoded: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::malformed(format!("invalid charge response: {}", e)))?;

        // Transport success is not enough; the redirect URL must be present.
        let checkout_url = Self::first_field(&decoded, REDIRECT_URL_FIELDS)
            .map(String::from)
            .ok_or_else(|| ProviderError::malformed("missing redirect URL"))?;

        let transaction_id = Self::first_field(&decoded, TRANSACTION_ID_FIELDS).map(String::from);

        tracing::info!(
            transaction_id = transaction_id.as_deref().unwrap_or("unknown"),
            "Bictorys charge created"
        );

        Ok(CheckoutSession {
            checkout_url,
            transaction_id,
        })
    }

    fn verify_event(&self, _payload: &[u8], signature: Option<&str>) -> Result<(), ProviderError> {
        let Some(secret) = &self.config.webhook_secret else {
            // No signature scheme mandated by the provider.
            return Ok(());
        };

        let provided = signature
            .ok_or_else(|| ProviderError::verification("missing X-Secret-Key header"))?;

        if !constant_time_compare(provided.as_bytes(), secret.expose_secret().as_bytes()) {
            return Err(ProviderError::verification("invalid X-Secret-Key"));
        }

        Ok(())
    }

    fn classify_event(&self, payload: &[u8]) -> Result<PaymentOutcome, ProviderError> {
        let payload: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|e| ProviderError::malformed(format!("invalid webhook payload: {}", e)))?;

        let status = payload.get("status").and_then(|v| v.as_str());
        let event_type = payload.get("eventType").and_then(|v| v.as_str());

        if status.is_some_and(|s| SUCCESS_STATUSES.contains(&s))
            || event_type == Some("payment.succeeded")
        {
            return Ok(self.classify_succeeded(&payload));
        }

        if status.is_some_and(|s| FAILURE_STATUSES.contains(&s))
            || event_type == Some("payment.failed")
        {
            return Ok(PaymentOutcome::Failed {
                provider_ref: Self::first_field(&payload, TRANSACTION_ID_FIELDS).map(String::from),
                reason: payload
                    .get("message")
                    .and_then(|v| v.as_str())
                    .or(status)
                    .map(String::from),
            });
        }

        tracing::debug!(
            status = status.unwrap_or("none"),
            event_type = event_type.unwrap_or("none"),
            "Ignoring event"
        );
        Ok(PaymentOutcome::Ignored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_adapter(webhook_secret: Option<&str>) -> BictorysAdapter {
        BictorysAdapter::new(BictorysConfig::new(
            "bictorys_test_key",
            webhook_secret.map(String::from),
            "https://api.bictorys.com",
            "http://localhost:5173",
        ))
    }

    fn intent(amount: f64, phone: Option<&str>) -> DonationIntent {
        DonationIntent {
            amount,
            email: "b@x.com".to_string(),
            name: Some("Awa".to_string()),
            phone: phone.map(String::from),
            is_anonymous: false,
            accept_newsletter: false,
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Charge Request Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn charge_request_converts_to_xof() {
        let adapter = test_adapter(None);
        let request = adapter.build_charge_request(&intent(20.0, None)).unwrap();

        assert_eq!(request.amount, 13120);
        assert_eq!(request.currency, "XOF");
    }

    #[test]
    fn charge_request_defaults_missing_phone() {
        let adapter = test_adapter(None);

        let request = adapter.build_charge_request(&intent(20.0, None)).unwrap();
        assert_eq!(request.customer.phone, DEFAULT_PHONE);

        let request = adapter
            .build_charge_request(&intent(20.0, Some("+221771234567")))
            .unwrap();
        assert_eq!(request.customer.phone, "+221771234567");
    }

    #[test]
    fn charge_request_embeds_donation_in_success_url() {
        let adapter = test_adapter(None);
        let request = adapter.build_charge_request(&intent(20.0, None)).unwrap();

        assert!(request.success_redirect_url.contains("/don-success?"));
        assert!(request.success_redirect_url.contains("amount=20"));
        assert!(request.success_redirect_url.contains("name=Awa"));
        assert!(request.success_redirect_url.contains("email=b%40x.com"));
        assert_eq!(
            request.error_redirect_url,
            "http://localhost:5173/faire-un-don"
        );
    }

    #[test]
    fn charge_request_references_are_distinct() {
        let adapter = test_adapter(None);
        let request = adapter.build_charge_request(&intent(20.0, None)).unwrap();

        assert_ne!(request.payment_reference, request.merchant_reference);
        assert!(request.payment_reference.starts_with("DON-"));
        assert!(request.merchant_reference.starts_with("SKYBLUE-"));
    }

    // ══════════════════════════════════════════════════════════════
    // Event Classification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn succeeded_status_classifies_with_eur_conversion() {
        let adapter = test_adapter(None);
        let payload = serde_json::json!({
            "id": "txn_123",
            "status": "succeeded",
            "amount": 13120,
            "customer": { "name": "Awa", "email": "b@x.com" }
        })
        .to_string();

        match adapter.classify_event(payload.as_bytes()).unwrap() {
            PaymentOutcome::Succeeded(p) => {
                assert_eq!(p.provider_ref, "txn_123");
                assert_eq!(p.amount_eur, 20.0);
                assert_eq!(p.email, "b@x.com");
                assert_eq!(p.name.as_deref(), Some("Awa"));
                assert_eq!(p.method, PaymentMethod::MobileMoney);
                assert_eq!(p.note.as_deref(), Some("Montant: 13120 XOF"));
            }
            other => panic!("Expected Succeeded, got {:?}", other),
        }
    }

    #[test]
    fn uppercase_failed_status_classifies_as_failed() {
        let adapter = test_adapter(None);
        let payload = serde_json::json!({
            "transactionId": "txn_456",
            "status": "FAILED"
        })
        .to_string();

        match adapter.classify_event(payload.as_bytes()).unwrap() {
            PaymentOutcome::Failed { provider_ref, .. } => {
                assert_eq!(provider_ref.as_deref(), Some("txn_456"));
            }
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn event_type_fallback_is_checked() {
        let adapter = test_adapter(None);

        let payload = serde_json::json!({
            "id": "txn_789",
            "eventType": "payment.succeeded",
            "amount": 656
        })
        .to_string();
        assert!(matches!(
            adapter.classify_event(payload.as_bytes()).unwrap(),
            PaymentOutcome::Succeeded(_)
        ));

        let payload = serde_json::json!({ "eventType": "payment.failed" }).to_string();
        assert!(matches!(
            adapter.classify_event(payload.as_bytes()).unwrap(),
            PaymentOutcome::Failed { .. }
        ));
    }

    #[test]
    fn status_outside_accepted_sets_is_ignored() {
        let adapter = test_adapter(None);

        for status in ["SUCCEEDED", "Paid", "pending", "processing", ""] {
            let payload = serde_json::json!({ "status": status }).to_string();
            assert!(
                matches!(
                    adapter.classify_event(payload.as_bytes()).unwrap(),
                    PaymentOutcome::Ignored
                ),
                "status {:?} should be ignored",
                status
            );
        }
    }

    #[test]
    fn missing_name_defaults_to_anonymous() {
        let adapter = test_adapter(None);
        let payload = serde_json::json!({
            "id": "txn_1",
            "status": "paid",
            "amount": 656,
            "email": "x@y.com"
        })
        .to_string();

        match adapter.classify_event(payload.as_bytes()).unwrap() {
            PaymentOutcome::Succeeded(p) => {
                assert_eq!(p.name.as_deref(), Some(ANONYMOUS_NAME));
                assert_eq!(p.email, "x@y.com");
                assert_eq!(p.amount_eur, 1.0);
            }
            other => panic!("Expected Succeeded, got {:?}", other),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Verification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn no_secret_configured_accepts_unsigned_events() {
        let adapter = test_adapter(None);
        assert!(adapter.verify_event(b"{}", None).is_ok());
    }

    #[test]
    fn configured_secret_is_enforced() {
        let adapter = test_adapter(Some("shared_secret"));

        assert!(adapter.verify_event(b"{}", Some("shared_secret")).is_ok());
        assert!(matches!(
            adapter.verify_event(b"{}", Some("wrong")),
            Err(ProviderError::Verification(_))
        ));
        assert!(matches!(
            adapter.verify_event(b"{}", None),
            Err(ProviderError::Verification(_))
        ));
    }
}
