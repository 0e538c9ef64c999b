//! Adapters - implementations of ports against external systems.

pub mod bictorys;
pub mod http;
pub mod postgres;
pub mod stripe;
