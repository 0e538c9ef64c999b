//! Bictorys adapter for mobile-money payments (XOF).

mod adapter;
mod types;

pub use adapter::{BictorysAdapter, BictorysConfig};
