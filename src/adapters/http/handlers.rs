//! HTTP handlers for the donation API.
//!
//! These handlers connect Axum routes to application layer command handlers.
//! Webhook routes take the raw body bytes; signature verification runs over
//! those exact bytes before any JSON parsing.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::{
    CreateCheckoutCommand, CreateCheckoutHandler, ProcessWebhookCommand, ProcessWebhookHandler,
    SubmitContactCommand, SubmitContactError, SubmitContactHandler,
};
use crate::domain::payment::ProviderError;
use crate::ports::{ContactRepository, DonationRepository, PaymentProvider};

use super::dto::{
    CheckoutResponse, ContactRequest, ContactResponse, CreateCheckoutRequest, ErrorResponse,
    HealthResponse, RootResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned per request; dependencies are Arc-wrapped for cheap sharing.
#[derive(Clone)]
pub struct AppState {
    pub stripe_provider: Arc<dyn PaymentProvider>,
    pub bictorys_provider: Arc<dyn PaymentProvider>,
    pub donation_repository: Arc<dyn DonationRepository>,
    pub contact_repository: Arc<dyn ContactRepository>,
    pub started_at: Instant,
}

impl AppState {
    pub fn stripe_checkout_handler(&self) -> CreateCheckoutHandler {
        CreateCheckoutHandler::new(self.stripe_provider.clone())
    }

    pub fn bictorys_checkout_handler(&self) -> CreateCheckoutHandler {
        CreateCheckoutHandler::new(self.bictorys_provider.clone())
    }

    pub fn stripe_webhook_handler(&self) -> ProcessWebhookHandler {
        ProcessWebhookHandler::new(
            self.stripe_provider.clone(),
            self.donation_repository.clone(),
        )
    }

    pub fn bictorys_webhook_handler(&self) -> ProcessWebhookHandler {
        ProcessWebhookHandler::new(
            self.bictorys_provider.clone(),
            self.donation_repository.clone(),
        )
    }

    pub fn contact_handler(&self) -> SubmitContactHandler {
        SubmitContactHandler::new(self.contact_repository.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Informational Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// `GET /` - liveness message.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Backend SkyBlue opérationnel",
    })
}

/// `GET /health` - health probe with uptime.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.started_at.elapsed().as_secs(),
        timestamp: chrono::Utc::now(),
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Checkout Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// `POST /api/create-checkout-session` - card checkout via Stripe.
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Json(request): Json<CreateCheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let intent = request.into_intent().map_err(ApiError::Provider)?;

    let session = state
        .stripe_checkout_handler()
        .handle(CreateCheckoutCommand { intent })
        .await
        .map_err(ApiError::Provider)?;

    Ok(Json(CheckoutResponse {
        id: session.transaction_id,
        url: session.checkout_url,
    }))
}

/// `POST /api/create-bictorys-payment` - mobile-money checkout via Bictorys.
pub async fn create_bictorys_payment(
    State(state): State<AppState>,
    Json(request): Json<CreateCheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let intent = request.into_intent().map_err(ApiError::Provider)?;

    let session = state
        .bictorys_checkout_handler()
        .handle(CreateCheckoutCommand { intent })
        .await
        .map_err(ApiError::Provider)?;

    Ok(Json(CheckoutResponse {
        id: session.transaction_id,
        url: session.checkout_url,
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// `POST /webhook/stripe` - card-processor async notification.
///
/// Takes the raw body; the `Stripe-Signature` header authenticates it.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let ack = state
        .stripe_webhook_handler()
        .handle(ProcessWebhookCommand {
            payload: body.to_vec(),
            signature,
        })
        .await
        .map_err(ApiError::Webhook)?;

    Ok(Json(ack))
}

/// `POST /webhook/bictorys` - local-processor async notification.
///
/// No signature is mandated; when a shared secret is configured the
/// `X-Secret-Key` header carries it.
pub async fn bictorys_webhook(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get("X-Secret-Key")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let ack = state
        .bictorys_webhook_handler()
        .handle(ProcessWebhookCommand {
            payload: body.to_vec(),
            signature,
        })
        .await
        .map_err(ApiError::Webhook)?;

    Ok(Json(ack))
}

// ════════════════════════════════════════════════════════════════════════════════
// Contact Endpoint
// ════════════════════════════════════════════════════════════════════════════════

/// `POST /api/contact` - contact message intake.
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, ApiError> {
    let message = state
        .contact_handler()
        .handle(SubmitContactCommand {
            name: request.name,
            email: request.email,
            subject: request.subject,
            message: request.message,
        })
        .await
        .map_err(ApiError::Contact)?;

    Ok(Json(ContactResponse {
        id: message.id,
        status: message.status,
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
///
/// Webhook errors always map to 400: by the time processing can fail, the
/// event has either failed verification or is undecodable, and provider
/// redelivery of such an event can never succeed.
pub enum ApiError {
    /// Error from the checkout-creation path.
    Provider(ProviderError),

    /// Error from the webhook path.
    Webhook(ProviderError),

    /// Error from contact submission.
    Contact(SubmitContactError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code, message) = match self {
            ApiError::Provider(e) => match &e {
                ProviderError::Validation { .. } => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", e.to_string())
                }
                ProviderError::Verification(_) => {
                    (StatusCode::BAD_REQUEST, "VERIFICATION_FAILED", e.to_string())
                }
                ProviderError::Gateway { .. } | ProviderError::MalformedResponse(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GATEWAY_ERROR",
                    e.to_string(),
                ),
            },
            ApiError::Webhook(e) => (StatusCode::BAD_REQUEST, "WEBHOOK_REJECTED", e.to_string()),
            ApiError::Contact(e) => match &e {
                SubmitContactError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", e.to_string())
                }
                SubmitContactError::Repository(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    e.to_string(),
                ),
            },
        };

        let body = ErrorResponse::new(error_code, message);
        (status, Json(body)).into_response()
    }
}
