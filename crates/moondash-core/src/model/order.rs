// ── Order domain type ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::lenient;
use super::rover::Rover;
use super::user::User;

/// Order status as reported by the backend.
///
/// The backend owns every transition; the client only reads. Values
/// outside the known set are kept verbatim in [`Unknown`](Self::Unknown)
/// so they can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Placed,
    Preparing,
    InTransit,
    Delivered,
    Cancelled,
    Unknown(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Placed => "placed",
            Self::Preparing => "preparing",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Unknown(raw) => raw,
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "placed" => Self::Placed,
            "preparing" => Self::Preparing,
            "in_transit" => Self::InTransit,
            "delivered" => Self::Delivered,
            "cancelled" => Self::Cancelled,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Unknown(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

/// A customer transaction, bound to a rover once a delivery begins.
///
/// `rover` is attached when listed for a customer, `customer` when
/// listed for a driver. Either may be absent or malformed; both decode
/// to `None` rather than failing the whole listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: EntityId,
    #[serde(rename = "customerId", default)]
    pub customer_id: Option<EntityId>,
    #[serde(rename = "roverId", default)]
    pub rover_id: Option<EntityId>,
    #[serde(rename = "totalPrice", default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub rover: Option<Rover>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub customer: Option<User>,
}
