//! Contact message persistence port.

use async_trait::async_trait;

use super::donation_repository::RepositoryError;
use crate::domain::donation::ContactMessage;

/// Port for contact-form message persistence.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Persist a submitted contact message.
    async fn insert(&self, message: &ContactMessage) -> Result<(), RepositoryError>;
}
