//! Donation persistence port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::donation::Donation;

/// Persistence-layer failure, already stripped of driver detail.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),
}

/// Result of an idempotent insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written.
    Inserted,

    /// A row with the same provider reference already existed; nothing
    /// was written.
    Duplicate,
}

/// Port for donation persistence.
#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// Insert a donation keyed on its provider reference.
    ///
    /// Redelivered webhook events produce the same provider reference; the
    /// implementation must treat a second insert for the same reference as
    /// a no-op and report [`InsertOutcome::Duplicate`].
    async fn insert(&self, donation: &Donation) -> Result<InsertOutcome, RepositoryError>;
}
