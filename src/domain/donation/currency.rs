//! Currency normalization between the donor-facing currency (EUR) and the
//! settlement currency used by Bictorys (XOF).
//!
//! The CFA franc is pegged to the euro, so a fixed rate is used. XOF has no
//! fractional unit; settlement amounts are whole francs.

/// Fixed exchange rate: 1 EUR = 656 XOF.
pub const EUR_TO_XOF_RATE: f64 = 656.0;

/// Convert a reference-currency amount (EUR) to settlement currency (XOF),
/// rounded to the nearest whole franc.
pub fn eur_to_xof(amount_eur: f64) -> i64 {
    (amount_eur * EUR_TO_XOF_RATE).round() as i64
}

/// Convert a settlement-currency amount (XOF) back to the reference
/// currency (EUR), rounded to 2 decimal places.
pub fn xof_to_eur(amount_xof: i64) -> f64 {
    let eur = amount_xof as f64 / EUR_TO_XOF_RATE;
    (eur * 100.0).round() / 100.0
}
