//! Contact message entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An inbound contact-form message. Create-only; moderation tooling mutates
/// the status out of band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl ContactMessage {
    pub fn new(name: String, email: String, subject: String, body: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            subject,
            body,
            status: "unread".to_string(),
            created_at: Utc::now(),
        }
    }
}
