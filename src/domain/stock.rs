//! Stock flags and availability accounting for items.

use chrono::{DateTime, Utc};

use crate::models::{Condition, Item};

/// Badge shown next to an item. Expiry outranks low stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    Ok,
    LowStock,
    Expired,
}

impl StockStatus {
    #[must_use]
    pub const fn marker(&self) -> &'static str {
        match self {
            Self::Ok => "✓",
            Self::LowStock => "▼",
            Self::Expired => "⚠",
        }
    }
}

impl Item {
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.available_quantity <= self.min_stock_level
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|d| d < now)
    }

    /// Whether the item belongs in the expired report: past its expiry date
    /// or flagged expired by staff.
    #[must_use]
    pub fn needs_disposal_review(&self, now: DateTime<Utc>) -> bool {
        self.is_expired(now) || self.condition == Condition::Expired
    }

    #[must_use]
    pub fn stock_status(&self, now: DateTime<Utc>) -> StockStatus {
        if self.is_expired(now) {
            StockStatus::Expired
        } else if self.is_low_stock() {
            StockStatus::LowStock
        } else {
            StockStatus::Ok
        }
    }

    #[must_use]
    pub const fn is_borrowable_now(&self) -> bool {
        self.is_borrowable && self.available_quantity > 0
    }

    /// `0 <= available_quantity <= quantity`.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.available_quantity >= 0 && self.available_quantity <= self.quantity
    }

    /// Projected item after `units` are handed out, or `None` if the borrow
    /// cannot be satisfied.
    #[must_use]
    pub fn after_borrow(&self, units: i64) -> Option<Self> {
        if units < 1 || units > self.available_quantity {
            return None;
        }
        let mut next = self.clone();
        next.available_quantity -= units;
        Some(next)
    }

    /// Projected item after `units` come back. Availability never exceeds
    /// the quantity on hand.
    #[must_use]
    pub fn after_return(&self, units: i64) -> Self {
        let mut next = self.clone();
        next.available_quantity = (self.available_quantity + units.max(0)).min(self.quantity);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item(quantity: i64, available: i64, min_stock: i64) -> Item {
        Item {
            id: 1,
            name: "Erlenmeyer Flask".to_string(),
            description: None,
            category_id: Some(1),
            category: None,
            quantity,
            available_quantity: available,
            unit: "pieces".to_string(),
            storage_location: Some("Cabinet A".to_string()),
            condition: Condition::Good,
            min_stock_level: min_stock,
            expiry_date: None,
            is_borrowable: true,
            image_url: None,
        }
    }

    #[test]
    fn test_low_stock_after_borrow() {
        let flask = item(10, 10, 5);
        assert!(!flask.is_low_stock());

        let after = flask.after_borrow(6).unwrap();
        assert_eq!(after.available_quantity, 4);
        assert!(after.is_low_stock());
        assert!(after.is_consistent());
    }

    #[test]
    fn test_low_stock_is_inclusive() {
        assert!(item(10, 5, 5).is_low_stock());
        assert!(!item(10, 6, 5).is_low_stock());
    }

    #[test]
    fn test_borrow_rejects_out_of_range() {
        let flask = item(10, 3, 1);
        assert!(flask.after_borrow(0).is_none());
        assert!(flask.after_borrow(4).is_none());
        assert!(flask.after_borrow(3).is_some());
    }

    #[test]
    fn test_return_never_exceeds_quantity() {
        let flask = item(10, 8, 1);
        let after = flask.after_return(5);
        assert_eq!(after.available_quantity, 10);
        assert!(after.is_consistent());
    }

    #[test]
    fn test_borrow_then_return_round_trip() {
        let flask = item(10, 10, 5);
        let out = flask.after_borrow(6).unwrap();
        let back = out.after_return(6);
        assert_eq!(back.available_quantity, 10);
        assert!(!back.is_low_stock());
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let mut reagent = item(4, 4, 1);
        assert!(!reagent.is_expired(now));

        reagent.expiry_date = Some(now + Duration::days(3));
        assert!(!reagent.is_expired(now));

        reagent.expiry_date = Some(now - Duration::days(3));
        assert!(reagent.is_expired(now));
        assert_eq!(reagent.stock_status(now), StockStatus::Expired);
    }

    #[test]
    fn test_condition_flag_counts_for_disposal_review() {
        let now = Utc::now();
        let mut reagent = item(4, 4, 1);
        reagent.condition = Condition::Expired;
        assert!(!reagent.is_expired(now));
        assert!(reagent.needs_disposal_review(now));
    }

    #[test]
    fn test_borrowable_now() {
        let mut flask = item(10, 0, 1);
        assert!(!flask.is_borrowable_now());
        flask.available_quantity = 2;
        assert!(flask.is_borrowable_now());
        flask.is_borrowable = false;
        assert!(!flask.is_borrowable_now());
    }
}
