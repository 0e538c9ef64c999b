//! Donor-supplied payment intent.

use serde::{Deserialize, Serialize};

use super::ProviderError;

/// Donor-supplied fields for creating a checkout session.
///
/// Both provider variants consume this one shape; each applies its own
/// validation on top of [`DonationIntent::validate_amount`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationIntent {
    /// Donation amount in EUR.
    pub amount: f64,

    /// Donor email, used for the receipt.
    pub email: String,

    /// Donor name. Optional for the card flow.
    pub name: Option<String>,

    /// Donor phone number (mobile-money flow).
    pub phone: Option<String>,

    #[serde(default)]
    pub is_anonymous: bool,

    #[serde(default)]
    pub accept_newsletter: bool,
}

impl DonationIntent {
    /// Reject missing or non-positive amounts. Both provider variants
    /// require this.
    pub fn validate_amount(&self) -> Result<(), ProviderError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ProviderError::validation(
                "amount",
                "must be a positive number",
            ));
        }
        Ok(())
    }

    /// Reject missing contact details. The mobile-money variant requires
    /// name and email on top of the amount.
    pub fn validate_contact(&self) -> Result<(), ProviderError> {
        if self.name.as_deref().unwrap_or("").trim().is_empty() {
            return Err(ProviderError::validation("name", "is required"));
        }
        if self.email.trim().is_empty() {
            return Err(ProviderError::validation("email", "is required"));
        }
        Ok(())
    }
}
