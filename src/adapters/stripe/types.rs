//! Stripe API wire types.
//!
//! Only the fields this integration reads are modelled; everything else in
//! the provider payload is ignored by serde.

use std::collections::HashMap;

use serde::Deserialize;

/// Response from `POST /v1/checkout/sessions`.
#[derive(Debug, Deserialize)]
pub struct StripeCheckoutSessionResponse {
    pub id: String,

    /// Hosted checkout URL the donor is redirected to.
    pub url: Option<String>,
}

/// Error envelope returned by the Stripe API on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct StripeErrorDetail {
    pub message: Option<String>,
}

/// Top-level webhook event envelope.
#[derive(Debug, Deserialize)]
pub struct StripeWebhookEvent {
    pub id: String,

    #[serde(rename = "type")]
    pub event_type: String,

    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    /// Raw event object; decoded per event type.
    pub object: serde_json::Value,
}

/// Checkout session object carried by `checkout.session.completed` events.
#[derive(Debug, Deserialize)]
pub struct StripeSessionObject {
    pub id: String,

    /// Total in the smallest currency unit (cents).
    pub amount_total: Option<i64>,

    /// Payment intent identifier.
    pub payment_intent: Option<String>,

    pub customer_details: Option<StripeCustomerDetails>,

    /// String-valued metadata set at session creation.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct StripeCustomerDetails {
    pub email: Option<String>,
}
