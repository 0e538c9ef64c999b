//! Payment domain: intent validation, canonical webhook outcomes, and
//! signature verification.

mod errors;
mod intent;
mod outcome;
pub mod signature;

pub use errors::ProviderError;
pub use intent::DonationIntent;
pub use outcome::{PaymentOutcome, SucceededPayment};
