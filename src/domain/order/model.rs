//! Order domain entity
//!
//! An order references one trip and, after creation, one invoice. Items
//! carry frozen passenger snapshots so a ticket's billed detail never
//! changes after issuance.

use chrono::{DateTime, Utc};

/// Order lifecycle status, mirroring the payment outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
    Canceled,
    Expired,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Canceled => "CANCELED",
            Self::Expired => "EXPIRED",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "PAID" => Self::Paid,
            "CANCELED" => Self::Canceled,
            "EXPIRED" => Self::Expired,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of the refund disbursement, kept distinct from the order status
/// so a failed payout never masks a committed cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisbursementStatus {
    /// No disbursement requested yet
    None,
    Settled,
    Failed,
}

impl DisbursementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Settled => "SETTLED",
            Self::Failed => "FAILED",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "SETTLED" => Self::Settled,
            "FAILED" => Self::Failed,
            _ => Self::None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: i32,
    pub code: String,
    pub customer_id: i32,
    pub trip_id: i32,
    pub invoice_id: Option<i32>,
    /// Minor currency units
    pub total: i64,
    pub discount: i64,
    pub subtotal: i64,
    pub status: OrderStatus,
    pub canceled_at: Option<DateTime<Utc>>,
    pub cancel_reason: Option<String>,
    pub refund_bank_code: Option<String>,
    pub refund_account_name: Option<String>,
    pub refund_account_number: Option<String>,
    pub disbursement_status: DisbursementStatus,
    pub disbursement_response: Option<String>,
    /// Watermark preventing duplicate departure reminders across
    /// overlapping sweeps
    pub last_reminded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One seat on one order, with the passenger snapshot frozen at issuance.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub seat_id: i32,
    pub passenger_name: String,
    pub passenger_phone: Option<String>,
    pub passenger_address: Option<String>,
    pub price: i64,
    pub discount: i64,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip_defaults_to_pending() {
        for s in [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Canceled,
            OrderStatus::Expired,
        ] {
            assert_eq!(OrderStatus::from_str(s.as_str()), s);
        }
        assert_eq!(OrderStatus::from_str("SETTLED"), OrderStatus::Pending);
    }

    #[test]
    fn disbursement_status_roundtrip() {
        for s in [
            DisbursementStatus::None,
            DisbursementStatus::Settled,
            DisbursementStatus::Failed,
        ] {
            assert_eq!(DisbursementStatus::from_str(s.as_str()), s);
        }
    }
}
