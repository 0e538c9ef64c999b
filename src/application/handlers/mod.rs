//! Command handlers connecting the HTTP surface to domain logic and ports.

mod create_checkout;
mod process_webhook;
mod submit_contact;

pub use create_checkout::{CreateCheckoutCommand, CreateCheckoutHandler};
pub use process_webhook::{ProcessWebhookCommand, ProcessWebhookHandler, WebhookAck};
pub use submit_contact::{SubmitContactCommand, SubmitContactError, SubmitContactHandler};
