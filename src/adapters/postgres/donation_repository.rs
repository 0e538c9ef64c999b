//! PostgreSQL implementation of DonationRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::donation::Donation;
use crate::ports::{DonationRepository, InsertOutcome, RepositoryError};

/// PostgreSQL implementation of the DonationRepository port.
///
/// Idempotency is enforced by the UNIQUE constraint on `provider_ref`;
/// redelivered webhook events hit `ON CONFLICT DO NOTHING` and report
/// [`InsertOutcome::Duplicate`].
pub struct PostgresDonationRepository {
    pool: PgPool,
}

impl PostgresDonationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DonationRepository for PostgresDonationRepository {
    async fn insert(&self, donation: &Donation) -> Result<InsertOutcome, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO donations (
                id, donor_name, donor_email, amount_eur, is_anonymous,
                accept_newsletter, provider_ref, payment_ref, method, status,
                note, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (provider_ref) DO NOTHING
            "#,
        )
        .bind(donation.id)
        .bind(&donation.donor_name)
        .bind(&donation.donor_email)
        .bind(donation.amount_eur)
        .bind(donation.is_anonymous)
        .bind(donation.accept_newsletter)
        .bind(&donation.provider_ref)
        .bind(&donation.payment_ref)
        .bind(donation.method.as_str())
        .bind(donation.status.as_str())
        .bind(&donation.note)
        .bind(donation.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to insert donation: {}", e)))?;

        if result.rows_affected() == 0 {
            tracing::info!(
                provider_ref = %donation.provider_ref,
                "Duplicate donation notification, skipping insert"
            );
            return Ok(InsertOutcome::Duplicate);
        }

        Ok(InsertOutcome::Inserted)
    }
}
