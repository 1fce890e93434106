//! Placed orders and the visitor's order history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::checkout::ShippingDetails;
use crate::pricing::Totals;
use crate::types::{CurrencyCode, OrderId, OrderStatus};

/// Snapshot of a cart at the moment it was ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub lines: Vec<CartLine>,
    pub totals: Totals,
    /// Display currency the visitor ordered in.
    pub currency: CurrencyCode,
    pub shipping: Option<ShippingDetails>,
    pub card_last4: String,
    pub status: OrderStatus,
}

/// Order number: the last six digits of the placement time in milliseconds.
#[must_use]
pub fn order_number(placed_at: DateTime<Utc>) -> OrderId {
    let millis = placed_at.timestamp_millis().rem_euclid(1_000_000);
    OrderId::new(format!("{millis:06}"))
}

/// Append-only list of placed orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderHistory {
    orders: Vec<Order>,
}

impl OrderHistory {
    pub fn push(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.orders.iter()
    }

    /// Most recent first.
    pub fn latest_first(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().rev()
    }

    #[must_use]
    pub fn find(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    /// Update an order's status. Returns whether the order exists.
    pub fn set_status(&mut self, id: &OrderId, status: OrderStatus) -> bool {
        match self.orders.iter_mut().find(|o| &o.id == id) {
            Some(order) => {
                order.status = status;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn order(id: &str) -> Order {
        Order {
            id: OrderId::from(id),
            placed_at: Utc::now(),
            lines: Vec::new(),
            totals: Totals::default(),
            currency: CurrencyCode::USD,
            shipping: None,
            card_last4: "4242".to_string(),
            status: OrderStatus::default(),
        }
    }

    #[test]
    fn test_order_number_is_six_padded_digits() {
        let at = Utc.timestamp_millis_opt(1_700_000_012_345).unwrap();
        assert_eq!(order_number(at).as_str(), "012345");
    }

    #[test]
    fn test_history_is_append_only_with_status_updates() {
        let mut history = OrderHistory::default();
        history.push(order("000001"));
        history.push(order("000002"));

        let latest: Vec<_> = history.latest_first().map(|o| o.id.as_str()).collect();
        assert_eq!(latest, ["000002", "000001"]);

        assert!(history.set_status(&OrderId::from("000001"), OrderStatus::Shipped));
        assert_eq!(
            history.find(&OrderId::from("000001")).unwrap().status,
            OrderStatus::Shipped
        );
        assert!(!history.set_status(&OrderId::from("999999"), OrderStatus::Shipped));
    }
}
