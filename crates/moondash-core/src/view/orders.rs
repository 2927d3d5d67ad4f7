// ── Order rows ──

use serde::Serialize;

use super::badge::{Badge, order_badge};
use crate::model::Order;

const UNASSIGNED: &str = "Unassigned";
const UNKNOWN_CUSTOMER: &str = "Unknown customer";
const NO_ADDRESS: &str = "No address on file";

/// Display projection of one order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRow {
    pub id: String,
    pub short_id: String,
    pub total_price: Option<f64>,
    pub badge: Badge,
    pub rover: String,
    pub customer: String,
    pub address: String,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        let customer = order.customer.as_ref();
        Self {
            id: order.id.to_string(),
            short_id: order.id.short(),
            total_price: order.total_price,
            badge: order_badge(&order.status),
            rover: order
                .rover
                .as_ref()
                .map_or_else(|| UNASSIGNED.to_owned(), |r| r.name.clone()),
            customer: customer
                .map(|c| c.name.as_str())
                .filter(|n| !n.is_empty())
                .unwrap_or(UNKNOWN_CUSTOMER)
                .to_owned(),
            address: customer
                .and_then(|c| c.address.as_deref())
                .filter(|a| !a.is_empty())
                .unwrap_or(NO_ADDRESS)
                .to_owned(),
        }
    }
}

impl OrderRow {
    /// `$12.50`, or `-` when the backend sent no price.
    pub fn price_label(&self) -> String {
        self.total_price
            .map_or_else(|| "-".to_owned(), |p| format!("${p:.2}"))
    }
}

/// Rows in backend order.
pub fn order_rows(orders: &[Order]) -> Vec<OrderRow> {
    orders.iter().map(OrderRow::from).collect()
}
