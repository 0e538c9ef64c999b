//! CreateCheckoutHandler - Command handler for checkout session creation.

use std::sync::Arc;

use crate::domain::payment::{DonationIntent, ProviderError};
use crate::ports::{CheckoutSession, PaymentProvider};

/// Command to create a hosted checkout session.
#[derive(Debug, Clone)]
pub struct CreateCheckoutCommand {
    pub intent: DonationIntent,
}

/// Handler for checkout session creation.
///
/// One instance per provider; the HTTP route decides which instance
/// serves the request. Creating a session never creates a donation
/// record — only a later verified webhook event does.
pub struct CreateCheckoutHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl CreateCheckoutHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutCommand,
    ) -> Result<CheckoutSession, ProviderError> {
        let session = self.provider.create_session(&cmd.intent).await?;

        tracing::info!(
            method = self.provider.method().as_str(),
            amount = cmd.intent.amount,
            "Checkout session created"
        );

        Ok(session)
    }
}
