//! Stripe adapter for card payments.

mod adapter;
mod types;

pub use adapter::{StripeAdapter, StripeConfig};
