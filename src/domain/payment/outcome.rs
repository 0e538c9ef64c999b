//! Canonical classification of provider webhook events.

use serde::{Deserialize, Serialize};

use crate::domain::donation::PaymentMethod;

/// Canonical outcome of a classified webhook event.
///
/// Provider-specific event-type and status strings stop at the classifier;
/// everything downstream sees only this enumeration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PaymentOutcome {
    /// Payment completed; carries everything the recorder needs.
    Succeeded(SucceededPayment),

    /// Payment failed or was cancelled by the donor.
    Failed {
        provider_ref: Option<String>,
        reason: Option<String>,
    },

    /// Recognized delivery but not an event we act on. Acknowledged with
    /// 200 so the provider does not redeliver.
    Ignored,
}

/// Classified data of a succeeded payment, normalized to EUR.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SucceededPayment {
    /// Provider transaction/session identifier (idempotency key).
    pub provider_ref: String,

    /// Secondary provider reference (e.g. Stripe payment intent).
    pub payment_ref: Option<String>,

    /// Amount in EUR.
    pub amount_eur: f64,

    /// Donor email from the verified event, not client-supplied.
    pub email: String,

    pub name: Option<String>,
    pub is_anonymous: bool,
    pub accept_newsletter: bool,
    pub method: PaymentMethod,

    /// Auxiliary text, e.g. the original settlement-currency amount.
    pub note: Option<String>,
}
