//! SkyBlue Donations - payment intake backend
//!
//! Accepts donation payments through Stripe (card) and Bictorys (mobile
//! money, settled in XOF) and reconciles provider webhook notifications
//! into donation records.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
