//! Order entity, item list, and the status state machine.
//!
//! # Design Decisions
//! - `total` is computed once at creation from the submitted items and
//!   never recalculated afterwards
//! - Status is a closed enum with validated transitions, tightening the
//!   accept-any-string behavior this service replaces:
//!   pending → processing | cancelled, processing → completed | cancelled

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Whether moving to `next` is a legal transition.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Processing)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Processing, OrderStatus::Completed)
                | (OrderStatus::Processing, OrderStatus::Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(ApiError::InvalidStatus(other.to_string())),
        }
    }
}

/// One line of an order. The product reference is not checked against
/// the product service (no referential integrity, as in the source).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub price: f64,
    pub quantity: u32,
}

/// An order document as stored and returned.
#[derive(Debug, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_email: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload.
#[derive(Debug, Deserialize)]
pub struct CreateOrder {
    pub items: Option<Vec<OrderItemPayload>>,
    pub user_email: Option<String>,
}

/// Item as submitted; price and quantity are required per item.
#[derive(Debug, Deserialize)]
pub struct OrderItemPayload {
    pub product_id: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<u32>,
}

/// A validated order ready to persist.
#[derive(Debug, Serialize)]
pub struct NewOrder {
    pub user_email: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Σ(price × quantity) over the item list.
fn order_total(items: &[OrderItem]) -> f64 {
    items
        .iter()
        .map(|item| item.price * f64::from(item.quantity))
        .sum()
}

impl CreateOrder {
    pub fn validate(self) -> Result<NewOrder, ApiError> {
        let mut missing = Vec::new();
        let has_items = self.items.as_ref().is_some_and(|items| !items.is_empty());
        if !has_items {
            missing.push("items");
        }
        if self.user_email.as_deref().unwrap_or("").is_empty() {
            missing.push("user_email");
        }
        if !missing.is_empty() {
            return Err(ApiError::MissingFields(missing));
        }

        let mut items = Vec::new();
        for payload in self.items.unwrap_or_default() {
            let price = payload.price.ok_or(ApiError::InvalidField {
                field: "items",
                reason: "every item requires a price".into(),
            })?;
            let quantity = payload.quantity.ok_or(ApiError::InvalidField {
                field: "items",
                reason: "every item requires a quantity".into(),
            })?;
            if price < 0.0 {
                return Err(ApiError::InvalidField {
                    field: "items",
                    reason: "item price must not be negative".into(),
                });
            }
            items.push(OrderItem {
                product_id: payload.product_id,
                price,
                quantity,
            });
        }

        let total = order_total(&items);
        let now = Utc::now();
        Ok(NewOrder {
            user_email: self.user_email.unwrap_or_default(),
            items,
            total,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Status patch payload.
#[derive(Debug, Deserialize)]
pub struct UpdateStatus {
    pub status: Option<String>,
}
