//! Subscription order domain entity
//!
//! A recurring-duration purchase, structurally parallel to an order plus
//! invoice. Reconciliation shares the invoice path but writes to
//! `expired_date` / `status` instead of seats and trip counters.

use chrono::{DateTime, Months, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Pending,
    Active,
    Expired,
    Canceled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
            Self::Canceled => "CANCELED",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "ACTIVE" => Self::Active,
            "EXPIRED" => Self::Expired,
            "CANCELED" => Self::Canceled,
            _ => Self::Pending,
        }
    }
}

/// New expiry after a successful payment: `duration` months from the paid
/// timestamp.
pub fn extend_expiry(paid_at: DateTime<Utc>, duration_months: u32) -> DateTime<Utc> {
    paid_at
        .checked_add_months(Months::new(duration_months))
        .unwrap_or(paid_at)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn expiry_extends_by_calendar_months() {
        let paid = Utc.with_ymd_and_hms(2025, 1, 31, 10, 0, 0).unwrap();
        let expiry = extend_expiry(paid, 1);
        // Chrono clamps to the last day of the shorter month.
        assert_eq!(expiry, Utc.with_ymd_and_hms(2025, 2, 28, 10, 0, 0).unwrap());

        let expiry3 = extend_expiry(paid, 3);
        assert_eq!(expiry3, Utc.with_ymd_and_hms(2025, 4, 30, 10, 0, 0).unwrap());
    }

    #[test]
    fn status_roundtrip() {
        for s in [
            SubscriptionStatus::Pending,
            SubscriptionStatus::Active,
            SubscriptionStatus::Expired,
            SubscriptionStatus::Canceled,
        ] {
            assert_eq!(SubscriptionStatus::from_str(s.as_str()), s);
        }
    }
}
