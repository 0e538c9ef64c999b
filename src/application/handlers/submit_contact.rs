//! SubmitContactHandler - Command handler for contact-form intake.

use std::sync::Arc;

use crate::domain::donation::ContactMessage;
use crate::domain::payment::ProviderError;
use crate::ports::{ContactRepository, RepositoryError};
use thiserror::Error;

/// Command carrying a submitted contact form.
#[derive(Debug, Clone)]
pub struct SubmitContactCommand {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Failure modes for contact submission.
#[derive(Debug, Clone, Error)]
pub enum SubmitContactError {
    #[error(transparent)]
    Validation(#[from] ProviderError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Handler for contact message intake. Create-only; moderation happens
/// out of band.
pub struct SubmitContactHandler {
    repository: Arc<dyn ContactRepository>,
}

impl SubmitContactHandler {
    pub fn new(repository: Arc<dyn ContactRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: SubmitContactCommand,
    ) -> Result<ContactMessage, SubmitContactError> {
        validate_field("name", &cmd.name)?;
        validate_field("email", &cmd.email)?;
        validate_field("subject", &cmd.subject)?;
        validate_field("message", &cmd.message)?;

        let message = ContactMessage::new(cmd.name, cmd.email, cmd.subject, cmd.message);
        self.repository.insert(&message).await?;

        tracing::info!(message_id = %message.id, "Contact message stored");

        Ok(message)
    }
}

fn validate_field(field: &'static str, value: &str) -> Result<(), ProviderError> {
    if value.trim().is_empty() {
        return Err(ProviderError::validation(field, "is required"));
    }
    Ok(())
}
