//! Invoice domain entity and payment-status normalization
//!
//! One gateway invoice per order (or subscription order). The gateway is
//! the source of truth for the raw status; side effects key off the
//! normalized outcome.

use chrono::{DateTime, Utc};

/// Raw gateway statuses treated as a successful payment.
pub const PAID_LIKE: [&str; 4] = ["PAID", "SETTLED", "CAPTURED", "SUCCEEDED"];

/// Raw gateway statuses treated as an expired/voided payment.
pub const EXPIRED_LIKE: [&str; 3] = ["EXPIRED", "VOIDED", "CANCELLED"];

/// Normalized payment outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Paid,
    Expired,
    /// Unrecognized statuses pass through unchanged
    PassThrough(String),
}

impl PaymentOutcome {
    /// Normalize a raw gateway status using the fixed membership sets.
    pub fn normalize(raw: &str) -> Self {
        let upper = raw.trim().to_ascii_uppercase();
        if PAID_LIKE.contains(&upper.as_str()) {
            Self::Paid
        } else if EXPIRED_LIKE.contains(&upper.as_str()) {
            Self::Expired
        } else {
            Self::PassThrough(upper)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Paid => "PAID",
            Self::Expired => "EXPIRED",
            Self::PassThrough(s) => s,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Invoice {
    pub id: i32,
    /// Our reference, echoed back by the gateway in callbacks. Unique;
    /// never re-created for the same reference.
    pub external_ref: String,
    pub gateway_invoice_id: String,
    pub payment_url: String,
    /// Last raw status as reported by the gateway (last-write-wins)
    pub raw_status: String,
    /// Normalized form of `raw_status`; side effects fire only when this
    /// changes
    pub normalized_status: String,
    pub paid_amount: Option<i64>,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub payment_channel: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paid_like_statuses_normalize_to_paid() {
        for raw in ["PAID", "SETTLED", "CAPTURED", "SUCCEEDED", "settled"] {
            assert_eq!(PaymentOutcome::normalize(raw), PaymentOutcome::Paid);
        }
    }

    #[test]
    fn expired_like_statuses_normalize_to_expired() {
        for raw in ["EXPIRED", "VOIDED", "CANCELLED", "voided"] {
            assert_eq!(PaymentOutcome::normalize(raw), PaymentOutcome::Expired);
        }
    }

    #[test]
    fn unknown_statuses_pass_through_uppercased() {
        assert_eq!(
            PaymentOutcome::normalize("pending"),
            PaymentOutcome::PassThrough("PENDING".into())
        );
        assert_eq!(PaymentOutcome::normalize("pending").as_str(), "PENDING");
    }
}
