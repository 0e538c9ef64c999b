//! PostgreSQL adapters - persistence implementations.

mod contact_repository;
mod donation_repository;

pub use contact_repository::PostgresContactRepository;
pub use donation_repository::PostgresDonationRepository;
