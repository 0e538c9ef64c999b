//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `donation` - Donation records, contact messages, currency normalization
//! - `payment` - Payment intents, canonical webhook outcomes, signature verification

pub mod donation;
pub mod payment;
