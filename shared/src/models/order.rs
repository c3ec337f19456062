//! Order Model (read-only from the console's point of view)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::serde_helpers::null_as_default;

/// Order line item
///
/// Kept as the raw row; the console only counts items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderItem(pub serde_json::Value);

/// Order entity, joined with its line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// UUID-like identifier (e.g. "a1b2c3d4-...")
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_name: String,
    /// Free-form phone as typed by the customer
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_phone: String,
    /// Accepts a JSON number or a numeric string
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_items: Vec<OrderItem>,
}

impl Order {
    pub fn item_count(&self) -> usize {
        self.order_items.len()
    }
}
