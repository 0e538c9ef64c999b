//! Bictorys API wire types.
//!
//! The request side is stable enough to model as structs. Responses and
//! webhook payloads vary by integration mode and release, so those are read
//! as raw JSON with field-priority extraction in the adapter.

use serde::Serialize;

/// Request body for charge creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BictorysChargeRequest {
    /// Amount in integer settlement units (XOF).
    pub amount: i64,

    pub currency: &'static str,

    /// Human-readable payment reference, timestamp-seeded.
    pub payment_reference: String,

    /// Human-readable merchant reference, timestamp-seeded and distinct
    /// from the payment reference.
    pub merchant_reference: String,

    /// Redirect carrying the donation details in its query string; this
    /// provider's redirect is the primary signal path in degraded
    /// scenarios.
    pub success_redirect_url: String,

    pub error_redirect_url: String,

    #[serde(rename = "customerObject")]
    pub customer: BictorysCustomer,
}

#[derive(Debug, Serialize)]
pub struct BictorysCustomer {
    pub name: String,
    pub phone: String,
    pub email: String,
}
