use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::Cart;

/// The `{productId, quantity}` pair both submission modes send to the
/// backend. Derived from the cart right before submission, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRef {
    pub product_id: i64,
    pub quantity: u32,
}

impl OrderItemRef {
    /// Snapshot the cart's lines in cart order.
    pub fn from_cart(cart: &Cart) -> Vec<Self> {
        cart.items
            .iter()
            .map(|item| Self {
                product_id: item.product.id,
                quantity: item.quantity,
            })
            .collect()
    }
}

/// Delivery fields of a detailed order draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetails {
    pub drop_location: String,
    pub landmark: String,
    pub contact_number: String,
}

impl DeliveryDetails {
    pub fn is_complete(&self) -> bool {
        !self.drop_location.trim().is_empty()
            && !self.landmark.trim().is_empty()
            && !self.contact_number.trim().is_empty()
    }
}

/// Payment-proof upload attached to a detailed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentProof {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PaymentProof {
    pub fn is_present(&self) -> bool {
        !self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: i64,
    pub product_name: String,
    pub quantity: u32,
    pub price: f64,
}

/// Committed order as reported by the backend. The client never assumes
/// one exists until the corresponding acknowledgement arrives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub order_status: OrderStatus,
    pub total_amount: f64,
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
