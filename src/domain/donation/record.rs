//! Donation record aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment rail a donation came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Card payment via Stripe checkout.
    Card,

    /// Mobile-money payment via Bictorys.
    MobileMoney,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::MobileMoney => "mobile-money",
        }
    }
}

/// Unified donation lifecycle status.
///
/// Provider-specific status strings ("completed", "paid", ...) are mapped to
/// this enumeration at the classifier boundary and never persist past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Pending,
    Succeeded,
    Failed,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::Succeeded => "succeeded",
            DonationStatus::Failed => "failed",
        }
    }
}

/// A recorded donation: the durable artifact of a successful payment.
///
/// Created only from a verified, classified "succeeded" webhook event, never
/// from the initial checkout-session creation call. The amount is always in
/// EUR; any settlement-currency amount survives only in `note`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,

    /// Donor name. `None` for anonymous donations.
    pub donor_name: Option<String>,

    /// Donor email, required for the receipt.
    pub donor_email: String,

    /// Amount in EUR (reference currency).
    pub amount_eur: f64,

    pub is_anonymous: bool,
    pub accept_newsletter: bool,

    /// Provider transaction/session identifier. Unique per donation; used
    /// as the idempotency key for webhook redelivery.
    pub provider_ref: String,

    /// Secondary provider reference (e.g. Stripe payment intent).
    pub payment_ref: Option<String>,

    pub method: PaymentMethod,
    pub status: DonationStatus,

    /// Free-text note. The Bictorys path stores the original settlement
    /// amount here ("Montant: 13120 XOF").
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Donation {
    /// Build a succeeded donation record from classified webhook data.
    #[allow(clippy::too_many_arguments)]
    pub fn succeeded(
        donor_name: Option<String>,
        donor_email: String,
        amount_eur: f64,
        is_anonymous: bool,
        accept_newsletter: bool,
        provider_ref: String,
        payment_ref: Option<String>,
        method: PaymentMethod,
        note: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            donor_name,
            donor_email,
            amount_eur,
            is_anonymous,
            accept_newsletter,
            provider_ref,
            payment_ref,
            method,
            status: DonationStatus::Succeeded,
            note,
            created_at: Utc::now(),
        }
    }
}
