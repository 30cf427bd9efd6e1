//! Voucher domain entity and discount arithmetic
//!
//! Percentage vouchers discount each item proportionally; flat vouchers
//! split evenly across items with the division remainder on the first item
//! so per-item discounts always sum to the aggregate.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoucherKind {
    /// `value` is a percentage (0..=100)
    Percent,
    /// `value` is a flat amount in minor currency units
    Flat,
}

impl VoucherKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percent => "PERCENT",
            Self::Flat => "FLAT",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "FLAT" => Self::Flat,
            _ => Self::Percent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Voucher {
    pub id: i32,
    pub code: String,
    pub kind: VoucherKind,
    pub value: i64,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Per-item and aggregate discount for one redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discount {
    pub total: i64,
    pub per_item: Vec<i64>,
}

impl Discount {
    pub fn zero(items: usize) -> Self {
        Self {
            total: 0,
            per_item: vec![0; items],
        }
    }
}

impl Voucher {
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.map(|at| at > now).unwrap_or(true)
    }

    /// Compute the discount over the given item prices. The aggregate never
    /// exceeds the order total.
    pub fn discount_for(&self, item_prices: &[i64]) -> Discount {
        if item_prices.is_empty() {
            return Discount::zero(0);
        }
        let order_total: i64 = item_prices.iter().sum();

        match self.kind {
            VoucherKind::Percent => {
                let pct = self.value.clamp(0, 100);
                let per_item: Vec<i64> = item_prices.iter().map(|p| p * pct / 100).collect();
                let total = per_item.iter().sum();
                Discount { total, per_item }
            }
            VoucherKind::Flat => {
                let total = self.value.clamp(0, order_total);
                let n = item_prices.len() as i64;
                let share = total / n;
                let remainder = total - share * n;
                let mut per_item = vec![share; item_prices.len()];
                per_item[0] += remainder;
                Discount { total, per_item }
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn voucher(kind: VoucherKind, value: i64) -> Voucher {
        Voucher {
            id: 1,
            code: "PROMO".into(),
            kind,
            value,
            is_active: true,
            expires_at: None,
        }
    }

    #[test]
    fn percent_discounts_each_item() {
        let d = voucher(VoucherKind::Percent, 10).discount_for(&[100_000, 50_000]);
        assert_eq!(d.per_item, vec![10_000, 5_000]);
        assert_eq!(d.total, 15_000);
    }

    #[test]
    fn flat_splits_evenly_with_remainder_on_first() {
        let d = voucher(VoucherKind::Flat, 10_000).discount_for(&[60_000, 60_000, 60_000]);
        assert_eq!(d.per_item, vec![3_334, 3_333, 3_333]);
        assert_eq!(d.total, 10_000);
        assert_eq!(d.per_item.iter().sum::<i64>(), d.total);
    }

    #[test]
    fn flat_discount_never_exceeds_order_total() {
        let d = voucher(VoucherKind::Flat, 500_000).discount_for(&[30_000, 20_000]);
        assert_eq!(d.total, 50_000);
    }

    #[test]
    fn inactive_or_expired_vouchers_are_not_redeemable() {
        let now = Utc::now();
        let mut v = voucher(VoucherKind::Percent, 10);
        assert!(v.is_redeemable(now));

        v.is_active = false;
        assert!(!v.is_redeemable(now));

        v.is_active = true;
        v.expires_at = Some(now - chrono::Duration::days(1));
        assert!(!v.is_redeemable(now));
    }

    #[test]
    fn empty_item_list_yields_zero_discount() {
        let d = voucher(VoucherKind::Flat, 10_000).discount_for(&[]);
        assert_eq!(d, Discount::zero(0));
    }
}
