// fastcart/core/src/model.rs

//! Data carried in and out of the order placement workflow.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type ProductId = i64;
pub type OrderId = i64;

/// Lifecycle state of an order. Only `Pending` is ever produced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Canceled,
  Completed,
}

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Canceled => "canceled",
      OrderStatus::Completed => "completed",
    }
  }
}

impl Default for OrderStatus {
  fn default() -> Self {
    OrderStatus::Pending
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
  type Err = UnknownOrderStatus;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(OrderStatus::Pending),
      "canceled" => Ok(OrderStatus::Canceled),
      "completed" => Ok(OrderStatus::Completed),
      other => Err(UnknownOrderStatus(other.to_string())),
    }
  }
}

/// One `{product_id, quantity}` entry of an incoming order request.
///
/// The quantity is wider than a stock level so that merged duplicates keep
/// their true total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedItem {
  pub product_id: ProductId,
  pub quantity: i64,
}

impl RequestedItem {
  pub fn new(product_id: ProductId, quantity: i64) -> Self {
    Self { product_id, quantity }
  }
}

/// A product row as seen under an exclusive row lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedProduct {
  pub id: ProductId,
  pub name: String,
  pub price: Decimal,
  pub stock: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockUpdate {
  pub id: ProductId,
  pub new_stock: i32,
}

/// Order header to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
  pub total_price: Decimal,
  pub status: OrderStatus,
}

/// Store-generated identity of an inserted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedOrder {
  pub id: OrderId,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderItem {
  pub order_id: OrderId,
  pub product_id: ProductId,
  pub quantity: i32,
  pub unit_price: Decimal,
}

/// One line of a materialized order. `price` is the unit price snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
  pub product_id: ProductId,
  pub product_name: String,
  pub quantity: i32,
  pub price: Decimal,
}

impl OrderLine {
  pub fn line_total(&self) -> Decimal {
    self.price * Decimal::from(self.quantity)
  }
}

/// A fully materialized order, as returned by creation and by read-back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedOrder {
  pub id: OrderId,
  pub total_price: Decimal,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
  pub items: Vec<OrderLine>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn order_status_round_trips_through_its_text_form() {
    for status in [OrderStatus::Pending, OrderStatus::Canceled, OrderStatus::Completed] {
      assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
    }
    assert!("shipped".parse::<OrderStatus>().is_err());
  }

  #[test]
  fn line_total_is_exact() {
    let line = OrderLine {
      product_id: 1,
      product_name: "Widget".to_string(),
      quantity: 3,
      price: Decimal::new(1999, 2),
    };
    assert_eq!(line.line_total(), Decimal::new(5997, 2));
  }
}
