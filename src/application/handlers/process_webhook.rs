//! ProcessWebhookHandler - Command handler for provider payment notifications.
//!
//! The reconciliation pipeline: verify → classify → record. Verification
//! runs over the raw body bytes and must succeed before any structured
//! parsing; a verification failure stops processing with no state mutation.
//!
//! Acknowledgement policy: once an event is verified and decodable, the
//! provider always receives a 200-class acknowledgement — including on
//! persistence failure, which is logged for out-of-band reconciliation.
//! Non-2xx acknowledgements trigger provider-side redelivery, which cannot
//! fix a persistence-layer problem.

use std::sync::Arc;

use crate::domain::donation::Donation;
use crate::domain::payment::{PaymentOutcome, ProviderError};
use crate::ports::{DonationRepository, InsertOutcome, PaymentProvider};

/// Command to process an inbound webhook delivery.
#[derive(Debug, Clone)]
pub struct ProcessWebhookCommand {
    /// Raw body bytes, unparsed.
    pub payload: Vec<u8>,

    /// Provider authentication header, if present.
    pub signature: Option<String>,
}

/// Acknowledgement returned to the provider.
#[derive(Debug, Clone, serde::Serialize)]
pub struct WebhookAck {
    pub received: bool,
    pub status: &'static str,
}

impl WebhookAck {
    fn of(status: &'static str) -> Self {
        Self {
            received: true,
            status,
        }
    }
}

/// Handler for the webhook reconciliation pipeline.
pub struct ProcessWebhookHandler {
    provider: Arc<dyn PaymentProvider>,
    repository: Arc<dyn DonationRepository>,
}

impl ProcessWebhookHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>, repository: Arc<dyn DonationRepository>) -> Self {
        Self {
            provider,
            repository,
        }
    }

    pub async fn handle(&self, cmd: ProcessWebhookCommand) -> Result<WebhookAck, ProviderError> {
        // Verification strictly precedes any parsing of event data.
        self.provider
            .verify_event(&cmd.payload, cmd.signature.as_deref())?;

        let outcome = self.provider.classify_event(&cmd.payload)?;

        match outcome {
            PaymentOutcome::Succeeded(payment) => {
                if payment.amount_eur <= 0.0 {
                    tracing::warn!(
                        provider_ref = %payment.provider_ref,
                        amount_eur = payment.amount_eur,
                        "Succeeded event with non-positive amount, not recording"
                    );
                    return Ok(WebhookAck::of("ignored"));
                }

                // Email is required for the receipt; a record without one
                // is unusable.
                if payment.email.trim().is_empty() {
                    tracing::warn!(
                        provider_ref = %payment.provider_ref,
                        "Succeeded event without donor email, not recording"
                    );
                    return Ok(WebhookAck::of("ignored"));
                }

                let donation = Donation::succeeded(
                    payment.name,
                    payment.email,
                    payment.amount_eur,
                    payment.is_anonymous,
                    payment.accept_newsletter,
                    payment.provider_ref,
                    payment.payment_ref,
                    payment.method,
                    payment.note,
                );

                match self.repository.insert(&donation).await {
                    Ok(InsertOutcome::Inserted) => {
                        tracing::info!(
                            provider_ref = %donation.provider_ref,
                            amount_eur = donation.amount_eur,
                            method = donation.method.as_str(),
                            "Donation recorded"
                        );
                    }
                    Ok(InsertOutcome::Duplicate) => {
                        tracing::info!(
                            provider_ref = %donation.provider_ref,
                            "Duplicate notification acknowledged without a second record"
                        );
                    }
                    Err(e) => {
                        // Acknowledged anyway; redelivery cannot fix this.
                        tracing::error!(
                            provider_ref = %donation.provider_ref,
                            error = %e,
                            "Failed to persist donation from verified event"
                        );
                    }
                }

                Ok(WebhookAck::of("succeeded"))
            }

            PaymentOutcome::Failed {
                provider_ref,
                reason,
            } => {
                tracing::info!(
                    provider_ref = provider_ref.as_deref().unwrap_or("unknown"),
                    reason = reason.as_deref().unwrap_or("unspecified"),
                    "Payment failed or cancelled"
                );
                Ok(WebhookAck::of("failed"))
            }

            PaymentOutcome::Ignored => Ok(WebhookAck::of("ignored")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::domain::donation::PaymentMethod;
    use crate::domain::payment::{DonationIntent, SucceededPayment};
    use crate::ports::{CheckoutSession, RepositoryError};

    /// Mock provider with scripted verification and classification results.
    struct MockProvider {
        verify_ok: bool,
        outcome: PaymentOutcome,
    }

    #[async_trait]
    impl PaymentProvider for MockProvider {
        fn method(&self) -> PaymentMethod {
            PaymentMethod::Card
        }

        async fn create_session(
            &self,
            _intent: &DonationIntent,
        ) -> Result<CheckoutSession, ProviderError> {
            unimplemented!("not used in webhook tests")
        }

        fn verify_event(
            &self,
            _payload: &[u8],
            _signature: Option<&str>,
        ) -> Result<(), ProviderError> {
            if self.verify_ok {
                Ok(())
            } else {
                Err(ProviderError::verification("signature mismatch"))
            }
        }

        fn classify_event(&self, _payload: &[u8]) -> Result<PaymentOutcome, ProviderError> {
            Ok(self.outcome.clone())
        }
    }

    /// In-memory repository enforcing provider_ref uniqueness.
    #[derive(Default)]
    struct MockRepository {
        donations: Mutex<Vec<Donation>>,
        fail_inserts: bool,
    }

    #[async_trait]
    impl DonationRepository for MockRepository {
        async fn insert(&self, donation: &Donation) -> Result<InsertOutcome, RepositoryError> {
            if self.fail_inserts {
                return Err(RepositoryError::Database("connection refused".to_string()));
            }

            let mut donations = self.donations.lock().unwrap();
            if donations
                .iter()
                .any(|d| d.provider_ref == donation.provider_ref)
            {
                return Ok(InsertOutcome::Duplicate);
            }
            donations.push(donation.clone());
            Ok(InsertOutcome::Inserted)
        }
    }

    fn succeeded_payment() -> PaymentOutcome {
        PaymentOutcome::Succeeded(SucceededPayment {
            provider_ref: "cs_test_123".to_string(),
            payment_ref: Some("pi_test_456".to_string()),
            amount_eur: 50.0,
            email: "a@x.com".to_string(),
            name: Some("Jean".to_string()),
            is_anonymous: false,
            accept_newsletter: true,
            method: PaymentMethod::Card,
            note: None,
        })
    }

    fn handler(
        verify_ok: bool,
        outcome: PaymentOutcome,
        repository: Arc<MockRepository>,
    ) -> ProcessWebhookHandler {
        ProcessWebhookHandler::new(
            Arc::new(MockProvider { verify_ok, outcome }),
            repository,
        )
    }

    fn command() -> ProcessWebhookCommand {
        ProcessWebhookCommand {
            payload: b"{}".to_vec(),
            signature: Some("t=0,v1=00".to_string()),
        }
    }

    #[tokio::test]
    async fn succeeded_event_records_donation() {
        let repository = Arc::new(MockRepository::default());
        let handler = handler(true, succeeded_payment(), repository.clone());

        let ack = handler.handle(command()).await.unwrap();

        assert_eq!(ack.status, "succeeded");
        let donations = repository.donations.lock().unwrap();
        assert_eq!(donations.len(), 1);
        assert_eq!(donations[0].amount_eur, 50.0);
        assert_eq!(donations[0].donor_email, "a@x.com");
    }

    #[tokio::test]
    async fn verification_failure_stops_processing() {
        let repository = Arc::new(MockRepository::default());
        let handler = handler(false, succeeded_payment(), repository.clone());

        let result = handler.handle(command()).await;

        assert!(matches!(result, Err(ProviderError::Verification(_))));
        assert!(repository.donations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_delivery_records_once() {
        let repository = Arc::new(MockRepository::default());
        let handler = handler(true, succeeded_payment(), repository.clone());

        let first = handler.handle(command()).await.unwrap();
        let second = handler.handle(command()).await.unwrap();

        assert_eq!(first.status, "succeeded");
        assert_eq!(second.status, "succeeded");
        assert_eq!(repository.donations.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_event_acknowledged_without_record() {
        let repository = Arc::new(MockRepository::default());
        let handler = handler(
            true,
            PaymentOutcome::Failed {
                provider_ref: Some("txn_456".to_string()),
                reason: Some("FAILED".to_string()),
            },
            repository.clone(),
        );

        let ack = handler.handle(command()).await.unwrap();

        assert_eq!(ack.status, "failed");
        assert!(repository.donations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ignored_event_acknowledged_without_record() {
        let repository = Arc::new(MockRepository::default());
        let handler = handler(true, PaymentOutcome::Ignored, repository.clone());

        let ack = handler.handle(command()).await.unwrap();

        assert_eq!(ack.status, "ignored");
        assert!(repository.donations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn persistence_failure_still_acknowledges() {
        let repository = Arc::new(MockRepository {
            fail_inserts: true,
            ..Default::default()
        });
        let handler = handler(true, succeeded_payment(), repository);

        let ack = handler.handle(command()).await.unwrap();
        assert_eq!(ack.status, "succeeded");
    }

    #[tokio::test]
    async fn missing_email_is_never_recorded() {
        let repository = Arc::new(MockRepository::default());
        let payment = match succeeded_payment() {
            PaymentOutcome::Succeeded(mut p) => {
                p.email = String::new();
                PaymentOutcome::Succeeded(p)
            }
            _ => unreachable!(),
        };
        let handler = handler(true, payment, repository.clone());

        let ack = handler.handle(command()).await.unwrap();

        assert_eq!(ack.status, "ignored");
        assert!(repository.donations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_positive_amount_is_never_recorded() {
        let repository = Arc::new(MockRepository::default());
        let payment = match succeeded_payment() {
            PaymentOutcome::Succeeded(mut p) => {
                p.amount_eur = 0.0;
                PaymentOutcome::Succeeded(p)
            }
            _ => unreachable!(),
        };
        let handler = handler(true, payment, repository.clone());

        let ack = handler.handle(command()).await.unwrap();

        assert_eq!(ack.status, "ignored");
        assert!(repository.donations.lock().unwrap().is_empty());
    }
}
