//! Donation domain: the durable artifacts of the payment flow.

mod contact;
pub mod currency;
mod record;

pub use contact::ContactMessage;
pub use record::{Donation, DonationStatus, PaymentMethod};
