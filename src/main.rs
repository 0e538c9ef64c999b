//! SkyBlue donations backend entry point.
//!
//! Loads configuration, connects to PostgreSQL, wires the payment provider
//! adapters to the HTTP router, and serves.

use std::sync::Arc;
use std::time::{Duration, Instant};

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use skyblue_donations::adapters::bictorys::{BictorysAdapter, BictorysConfig};
use skyblue_donations::adapters::http::{app_router, AppState};
use skyblue_donations::adapters::postgres::{PostgresContactRepository, PostgresDonationRepository};
use skyblue_donations::adapters::stripe::{StripeAdapter, StripeConfig};
use skyblue_donations::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    tracing::info!(
        environment = ?config.server.environment,
        stripe_test_mode = config.payment.is_test_mode(),
        "Starting SkyBlue donations backend"
    );

    if config.is_production() && !config.payment.is_live_mode() {
        tracing::warn!("Production environment is using a non-live Stripe key");
    }

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let frontend_origin = config.server.frontend_origin().to_string();

    let stripe_provider = Arc::new(StripeAdapter::new(StripeConfig::new(
        config.payment.stripe_api_key.clone(),
        config.payment.stripe_webhook_secret.clone(),
        frontend_origin.clone(),
    )));
    let bictorys_provider = Arc::new(BictorysAdapter::new(BictorysConfig::new(
        config.payment.bictorys_api_key.clone(),
        config.payment.bictorys_webhook_secret.clone(),
        config.payment.bictorys_base_url.clone(),
        frontend_origin.clone(),
    )));

    let state = AppState {
        stripe_provider,
        bictorys_provider,
        donation_repository: Arc::new(PostgresDonationRepository::new(pool.clone())),
        contact_repository: Arc::new(PostgresContactRepository::new(pool)),
        started_at: Instant::now(),
    };

    let router = app_router(
        state,
        &frontend_origin,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    let addr = config.server.socket_addr();
    tracing::info!(%addr, frontend = %frontend_origin, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
