// fastcart/core/src/builder.rs

//! Places an order against locked inventory inside one store transaction.

use crate::error::OrderError;
use crate::model::{
  CreatedOrder, LockedProduct, NewOrder, NewOrderItem, OrderId, OrderLine, OrderStatus, ProductId, RequestedItem,
  StockUpdate,
};
use crate::normalize::normalize_items;
use crate::store::{OrderStore, OrderTransaction};
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, error, info, instrument, warn};

pub const EMPTY_ORDER_MESSAGE: &str = "order must contain at least one item";

/// Entry point of order placement.
///
/// Cheap to share: the builder holds nothing but its store, and every call to
/// [`create_order`](Self::create_order) opens its own transaction.
#[derive(Debug, Clone)]
pub struct OrderBuilder<S> {
  store: S,
}

impl<S> OrderBuilder<S>
where
  S: OrderStore,
{
  pub fn new(store: S) -> Self {
    Self { store }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  /// Validates, prices and persists an order, decrementing stock for every line.
  ///
  /// Either everything is written or nothing is: on any failure the
  /// transaction is rolled back before the error is returned.
  ///
  /// Error priority follows the order of the pass over the normalized items:
  /// the first insufficient-stock line fails immediately, unknown product ids
  /// are collected and reported together only after the full pass.
  #[instrument(name = "OrderBuilder::create_order", skip(self, items), fields(requested_lines = items.len()))]
  pub async fn create_order(&self, items: Vec<RequestedItem>) -> Result<CreatedOrder, OrderError> {
    if items.is_empty() {
      return Err(OrderError::validation(EMPTY_ORDER_MESSAGE));
    }
    if let Some(bad) = items.iter().find(|item| item.quantity <= 0) {
      return Err(OrderError::Validation(format!(
        "quantity must be greater than 0 for product {}",
        bad.product_id
      )));
    }

    let items = normalize_items(items);
    debug!(normalized_lines = items.len(), "Order items normalized.");

    let mut tx = self.store.begin().await.map_err(|e| report(OrderError::from(e)))?;

    match place_order(tx.as_mut(), &items).await {
      Ok(order) => {
        tx.commit().await.map_err(|e| report(OrderError::from(e)))?;
        info!(order_id = order.id, total_price = %order.total_price, lines = order.items.len(), "Order created.");
        Ok(order)
      }
      Err(err) => {
        if let Err(rollback_err) = tx.rollback().await {
          warn!(error = %rollback_err, "Rollback after failed order placement did not complete cleanly.");
        }
        Err(report(err))
      }
    }
  }

  /// Reads back a committed order.
  #[instrument(name = "OrderBuilder::find_order", skip(self))]
  pub async fn find_order(&self, id: OrderId) -> Result<Option<CreatedOrder>, OrderError> {
    self.store.find_order(id).await.map_err(|e| report(OrderError::from(e)))
  }
}

/// Logs the full cause chain of non-validation failures before they are
/// handed to a caller that only sees the opaque message.
fn report(err: OrderError) -> OrderError {
  match &err {
    OrderError::Validation(message) => debug!(%message, "Order rejected."),
    OrderError::Transient { source } => warn!(error = ?source, "Transient store failure during order placement."),
    OrderError::Internal { source } => error!(error = ?source, "Unexpected failure during order placement."),
  }
  err
}

async fn place_order(tx: &mut dyn OrderTransaction, items: &[RequestedItem]) -> Result<CreatedOrder, OrderError> {
  let product_ids: Vec<ProductId> = items.iter().map(|item| item.product_id).collect();
  let locked = tx.lock_products_for_update(&product_ids).await?;
  debug!(requested = product_ids.len(), locked = locked.len(), "Inventory rows locked.");

  let priced = price_items(items, &locked)?;

  tx.update_stocks(&priced.stock_updates).await?;

  let placed = tx
    .insert_order(&NewOrder {
      total_price: priced.total_price,
      status: OrderStatus::Pending,
    })
    .await?;

  let order_items: Vec<NewOrderItem> = priced
    .lines
    .iter()
    .map(|line| NewOrderItem {
      order_id: placed.id,
      product_id: line.product_id,
      quantity: line.quantity,
      unit_price: line.price,
    })
    .collect();
  tx.insert_order_items(&order_items).await?;

  Ok(CreatedOrder {
    id: placed.id,
    total_price: priced.total_price,
    status: OrderStatus::Pending,
    created_at: placed.created_at,
    items: priced.lines,
  })
}

#[derive(Debug)]
struct PricedOrder {
  lines: Vec<OrderLine>,
  stock_updates: Vec<StockUpdate>,
  total_price: Decimal,
}

/// Pure pricing pass over normalized items and their locked rows.
fn price_items(items: &[RequestedItem], locked: &HashMap<ProductId, LockedProduct>) -> Result<PricedOrder, OrderError> {
  let mut missing: BTreeSet<ProductId> = BTreeSet::new();
  let mut lines = Vec::with_capacity(items.len());
  let mut stock_updates = Vec::with_capacity(items.len());
  let mut total_price = Decimal::ZERO;

  for item in items {
    let Some(product) = locked.get(&item.product_id) else {
      missing.insert(item.product_id);
      continue;
    };

    // A quantity that does not fit a stock level cannot be covered by one either.
    let quantity = match i32::try_from(item.quantity) {
      Ok(quantity) if quantity <= product.stock => quantity,
      _ => {
        return Err(OrderError::Validation(format!(
          "insufficient stock for product {}: requested {}, available {}",
          product.id, item.quantity, product.stock
        )))
      }
    };

    let line = OrderLine {
      product_id: product.id,
      product_name: product.name.clone(),
      quantity,
      price: product.price,
    };
    total_price += line.line_total();
    stock_updates.push(StockUpdate {
      id: product.id,
      new_stock: product.stock - quantity,
    });
    lines.push(line);
  }

  if !missing.is_empty() {
    let ids: Vec<String> = missing.iter().map(ProductId::to_string).collect();
    return Err(OrderError::Validation(format!(
      "products not found for ids: {}",
      ids.join(", ")
    )));
  }

  if total_price <= Decimal::ZERO {
    return Err(OrderError::validation("order total must be greater than zero"));
  }

  Ok(PricedOrder {
    lines,
    stock_updates,
    total_price,
  })
}
