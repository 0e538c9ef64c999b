//! Port definitions for hexagonal architecture.
//!
//! Ports are trait interfaces that the application core depends on. Adapters
//! implement these traits to connect to external systems (payment gateways,
//! databases). This keeps the domain logic independent of infrastructure.

pub mod contact_repository;
pub mod donation_repository;
pub mod payment_provider;

pub use contact_repository::ContactRepository;
pub use donation_repository::{DonationRepository, InsertOutcome, RepositoryError};
pub use payment_provider::{CheckoutSession, PaymentProvider};
