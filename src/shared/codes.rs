//! Business code generation
//!
//! Trips, manifests (SPJ) and orders all carry short human-readable codes;
//! invoices carry an opaque UUID external reference handed to the payment
//! gateway.

use chrono::NaiveDate;
use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}

/// Trip code, e.g. `TRP-20250301-7F3K2A`
pub fn trip_code(date: NaiveDate) -> String {
    format!("TRP-{}-{}", date.format("%Y%m%d"), random_suffix(6))
}

/// Manifest (SPJ) code shared by all legs of one direction on one date,
/// e.g. `SPJ-20250301-9Q1ZXB`
pub fn manifest_code(date: NaiveDate) -> String {
    format!("SPJ-{}-{}", date.format("%Y%m%d"), random_suffix(6))
}

/// Order code, e.g. `ORD-4H8S2KQW`
pub fn order_code() -> String {
    format!("ORD-{}", random_suffix(8))
}

/// Subscription order code, e.g. `SUB-4H8S2KQW`
pub fn subscription_code() -> String {
    format!("SUB-{}", random_suffix(8))
}

/// External reference passed to the payment gateway. Must be unique per
/// invoice; the gateway echoes it back in the callback.
pub fn external_ref() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_code_embeds_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let code = trip_code(date);
        assert!(code.starts_with("TRP-20250301-"));
        assert_eq!(code.len(), "TRP-20250301-".len() + 6);
    }

    #[test]
    fn manifest_codes_are_unique_per_call() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_ne!(manifest_code(date), manifest_code(date));
    }

    #[test]
    fn external_ref_is_uuid() {
        let r = external_ref();
        assert!(Uuid::parse_str(&r).is_ok());
    }
}
