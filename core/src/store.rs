// fastcart/core/src/store.rs

//! The persistence boundary the order builder works against.
//!
//! A store hands out explicitly scoped transaction handles. Every operation on
//! [`OrderTransaction`] runs inside that one transaction; the handle is released
//! by `commit` or `rollback`, and implementations must also roll back when a
//! handle is dropped without either.

use crate::error::StoreResult;
use crate::model::{
  CreatedOrder, LockedProduct, NewOrder, NewOrderItem, OrderId, PlacedOrder, ProductId, StockUpdate,
};
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Opens a write transaction.
  async fn begin(&self) -> StoreResult<Box<dyn OrderTransaction>>;

  /// Reads back a committed order with its lines, or `None` if the id is unknown.
  async fn find_order(&self, id: OrderId) -> StoreResult<Option<CreatedOrder>>;
}

#[async_trait]
pub trait OrderTransaction: Send {
  /// Reads the given product rows and takes an exclusive lock on each row found.
  ///
  /// Locks are acquired in ascending id order and held until the transaction
  /// ends. Ids with no matching row are simply absent from the result.
  async fn lock_products_for_update(&mut self, ids: &[ProductId]) -> StoreResult<HashMap<ProductId, LockedProduct>>;

  /// Writes new stock levels for rows previously locked by this transaction.
  ///
  /// The update is conditional on `new_stock >= 0`; a violating entry fails the
  /// whole batch.
  async fn update_stocks(&mut self, updates: &[StockUpdate]) -> StoreResult<()>;

  async fn insert_order(&mut self, order: &NewOrder) -> StoreResult<PlacedOrder>;

  async fn insert_order_items(&mut self, items: &[NewOrderItem]) -> StoreResult<()>;

  async fn commit(self: Box<Self>) -> StoreResult<()>;

  async fn rollback(self: Box<Self>) -> StoreResult<()>;
}
