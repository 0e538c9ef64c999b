//! PostgreSQL implementation of ContactRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::donation::ContactMessage;
use crate::ports::{ContactRepository, RepositoryError};

/// PostgreSQL implementation of the ContactRepository port.
pub struct PostgresContactRepository {
    pool: PgPool,
}

impl PostgresContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PostgresContactRepository {
    async fn insert(&self, message: &ContactMessage) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO contact_messages (
                id, name, email, subject, body, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(message.id)
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.body)
        .bind(&message.status)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            RepositoryError::Database(format!("Failed to insert contact message: {}", e))
        })?;

        Ok(())
    }
}
