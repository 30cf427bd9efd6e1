//! Seat domain entity
//!
//! One bookable unit of capacity on a specific trip. The status machine is
//! `AVAILABLE → ONHOLD → PAID → CHECKIN`; reverse transitions are
//! `ONHOLD → AVAILABLE` (hold expiry) and `PAID → AVAILABLE` (payment
//! expired at the gateway), and a payment landing after the hold lapsed
//! moves a released seat straight `AVAILABLE → PAID`. A seat is never
//! shared by two non-cancelled orders; transitions are guarded by an
//! optimistic version counter.

use chrono::{DateTime, Utc};

/// Seat reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatStatus {
    Available,
    OnHold,
    Paid,
    CheckIn,
}

impl SeatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::OnHold => "ONHOLD",
            Self::Paid => "PAID",
            Self::CheckIn => "CHECKIN",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "ONHOLD" => Self::OnHold,
            "PAID" => Self::Paid,
            "CHECKIN" => Self::CheckIn,
            _ => Self::Available,
        }
    }
}

impl std::fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One seat on one trip
#[derive(Debug, Clone)]
pub struct Seat {
    pub id: i32,
    pub trip_id: i32,
    pub code: String,
    pub row: i32,
    pub column: i32,
    pub is_avail: bool,
    pub status: SeatStatus,
    /// Set when the seat enters ONHOLD; the expiry sweep releases holds
    /// past this instant
    pub hold_expires_at: Option<DateTime<Utc>>,
    /// Optimistic concurrency counter, bumped on every transition
    pub version: i32,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrip_defaults_to_available() {
        for s in [
            SeatStatus::Available,
            SeatStatus::OnHold,
            SeatStatus::Paid,
            SeatStatus::CheckIn,
        ] {
            assert_eq!(SeatStatus::from_str(s.as_str()), s);
        }
        assert_eq!(SeatStatus::from_str("???"), SeatStatus::Available);
    }
}
