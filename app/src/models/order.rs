// fastcart/app/src/models/order.rs

use chrono::{DateTime, Utc};
use fastcart::{OrderStatus, RequestedItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};

/// Database mirror of [`OrderStatus`] for the `order_status_enum` column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, SqlxType)]
#[sqlx(type_name = "order_status_enum", rename_all = "lowercase")]
pub enum DbOrderStatus {
  Pending,
  Canceled,
  Completed,
}

impl From<OrderStatus> for DbOrderStatus {
  fn from(status: OrderStatus) -> Self {
    match status {
      OrderStatus::Pending => DbOrderStatus::Pending,
      OrderStatus::Canceled => DbOrderStatus::Canceled,
      OrderStatus::Completed => DbOrderStatus::Completed,
    }
  }
}

impl From<DbOrderStatus> for OrderStatus {
  fn from(status: DbOrderStatus) -> Self {
    match status {
      DbOrderStatus::Pending => OrderStatus::Pending,
      DbOrderStatus::Canceled => OrderStatus::Canceled,
      DbOrderStatus::Completed => OrderStatus::Completed,
    }
  }
}

/// Order header as listed by `GET /api/v1/orders`.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
  pub id: i64,
  pub total_price: Decimal,
  pub status: OrderStatus,
  pub item_count: i64,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct OrderSummaryRow {
  pub id: i64,
  pub total_price: Decimal,
  pub status: DbOrderStatus,
  pub item_count: i64,
  pub created_at: DateTime<Utc>,
}

impl From<OrderSummaryRow> for OrderSummary {
  fn from(row: OrderSummaryRow) -> Self {
    Self {
      id: row.id,
      total_price: row.total_price,
      status: row.status.into(),
      item_count: row.item_count,
      created_at: row.created_at,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemPayload {
  pub product_id: i64,
  pub quantity: i32,
}

/// Body of `POST /api/v1/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
  pub items: Vec<OrderItemPayload>,
}

impl CreateOrderRequest {
  /// Field-level checks. An empty list passes here; the order builder rejects it.
  pub fn validate(&self) -> Result<(), Vec<String>> {
    let details: Vec<String> = self
      .items
      .iter()
      .enumerate()
      .filter(|(_, item)| item.quantity <= 0)
      .map(|(idx, _)| format!("items[{}].quantity: must be greater than 0", idx))
      .collect();

    if details.is_empty() {
      Ok(())
    } else {
      Err(details)
    }
  }

  pub fn into_requested_items(self) -> Vec<RequestedItem> {
    self
      .items
      .into_iter()
      .map(|item| RequestedItem::new(item.product_id, i64::from(item.quantity)))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn request(lines: &[(i64, i32)]) -> CreateOrderRequest {
    CreateOrderRequest {
      items: lines
        .iter()
        .map(|&(product_id, quantity)| OrderItemPayload { product_id, quantity })
        .collect(),
    }
  }

  #[test]
  fn positive_quantities_pass() {
    assert!(request(&[(1, 2), (2, 1)]).validate().is_ok());
  }

  #[test]
  fn empty_request_is_left_to_the_builder() {
    assert!(request(&[]).validate().is_ok());
  }

  #[test]
  fn each_bad_quantity_is_reported() {
    let details = request(&[(1, 0), (2, 3), (3, -1)]).validate().unwrap_err();
    assert_eq!(
      details,
      vec![
        "items[0].quantity: must be greater than 0".to_string(),
        "items[2].quantity: must be greater than 0".to_string(),
      ]
    );
  }

  #[test]
  fn payload_parses_from_json() {
    let req: CreateOrderRequest =
      serde_json::from_str(r#"{"items":[{"product_id":7,"quantity":2}]}"#).unwrap();
    assert_eq!(req.into_requested_items(), vec![RequestedItem::new(7, 2)]);
  }

  #[test]
  fn status_converts_both_ways() {
    for status in [OrderStatus::Pending, OrderStatus::Canceled, OrderStatus::Completed] {
      assert_eq!(OrderStatus::from(DbOrderStatus::from(status)), status);
    }
  }
}
