//! Axum router configuration for the donation API.

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    bictorys_webhook, create_bictorys_payment, create_checkout_session, health, root,
    stripe_webhook, submit_contact, AppState,
};

/// Build the complete application router.
///
/// # Routes
///
/// ## Informational
/// - `GET /` - liveness message
/// - `GET /health` - health probe (uptime, timestamp)
///
/// ## Checkout (frontend-facing, CORS-restricted)
/// - `POST /api/create-checkout-session` - Stripe card checkout
/// - `POST /api/create-bictorys-payment` - Bictorys mobile-money checkout
/// - `POST /api/contact` - contact message intake
///
/// ## Webhooks (provider-facing, signature-verified)
/// - `POST /webhook/stripe`
/// - `POST /webhook/bictorys`
pub fn app_router(state: AppState, frontend_origin: &str, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/create-checkout-session", post(create_checkout_session))
        .route("/api/create-bictorys-payment", post(create_bictorys_payment))
        .route("/api/contact", post(submit_contact))
        .route("/webhook/stripe", post(stripe_webhook))
        .route("/webhook/bictorys", post(bictorys_webhook))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors_layer(frontend_origin))
        .with_state(state)
}

/// CORS policy: only the configured frontend origin may call the API.
fn cors_layer(frontend_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    match frontend_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!(
                origin = frontend_origin,
                "Invalid frontend origin, CORS left closed"
            );
            layer
        }
    }
}
