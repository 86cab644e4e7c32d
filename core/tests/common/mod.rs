// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use fastcart::{
  CreatedOrder, InMemoryStore, LockedProduct, NewOrder, NewOrderItem, OrderId, OrderStore, OrderTransaction,
  PlacedOrder, ProductId, StockUpdate, StoreError, StoreResult,
};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::Level;

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// Inserts a product priced in whole currency units.
pub fn seed_product(store: &InMemoryStore, name: &str, price: i64, stock: i32) -> ProductId {
  store
    .insert_product(name, Decimal::from(price), stock)
    .expect("valid product")
}

pub fn line_sum(order: &CreatedOrder) -> Decimal {
  order.items.iter().map(|line| line.line_total()).sum()
}

// --- Fault injection ---

/// Step of a transaction at which [`FailingStore`] injects an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
  Begin,
  UpdateStocks,
  InsertOrder,
  InsertOrderItems,
  Commit,
}

/// Wraps an [`InMemoryStore`] and fails one transaction step with the given
/// error class. Everything else is delegated.
#[derive(Debug, Clone)]
pub struct FailingStore {
  pub inner: InMemoryStore,
  pub fail_at: FailAt,
  pub transient: bool,
}

impl FailingStore {
  pub fn new(inner: InMemoryStore, fail_at: FailAt, transient: bool) -> Self {
    Self {
      inner,
      fail_at,
      transient,
    }
  }
}

fn injected(step: FailAt, transient: bool) -> StoreError {
  let cause = anyhow::anyhow!("injected failure at {:?}", step);
  if transient {
    StoreError::Transient(cause)
  } else {
    StoreError::Unexpected(cause)
  }
}

#[async_trait]
impl OrderStore for FailingStore {
  async fn begin(&self) -> StoreResult<Box<dyn OrderTransaction>> {
    if self.fail_at == FailAt::Begin {
      return Err(injected(FailAt::Begin, self.transient));
    }
    Ok(Box::new(FailingTransaction {
      inner: self.inner.begin().await?,
      fail_at: self.fail_at,
      transient: self.transient,
    }))
  }

  async fn find_order(&self, id: OrderId) -> StoreResult<Option<CreatedOrder>> {
    self.inner.find_order(id).await
  }
}

pub struct FailingTransaction {
  inner: Box<dyn OrderTransaction>,
  fail_at: FailAt,
  transient: bool,
}

impl FailingTransaction {
  fn check(&self, step: FailAt) -> StoreResult<()> {
    if self.fail_at == step {
      Err(injected(step, self.transient))
    } else {
      Ok(())
    }
  }
}

#[async_trait]
impl OrderTransaction for FailingTransaction {
  async fn lock_products_for_update(&mut self, ids: &[ProductId]) -> StoreResult<HashMap<ProductId, LockedProduct>> {
    self.inner.lock_products_for_update(ids).await
  }

  async fn update_stocks(&mut self, updates: &[StockUpdate]) -> StoreResult<()> {
    self.inner.update_stocks(updates).await?;
    self.check(FailAt::UpdateStocks)
  }

  async fn insert_order(&mut self, order: &NewOrder) -> StoreResult<PlacedOrder> {
    let placed = self.inner.insert_order(order).await?;
    self.check(FailAt::InsertOrder)?;
    Ok(placed)
  }

  async fn insert_order_items(&mut self, items: &[NewOrderItem]) -> StoreResult<()> {
    self.inner.insert_order_items(items).await?;
    self.check(FailAt::InsertOrderItems)
  }

  async fn commit(self: Box<Self>) -> StoreResult<()> {
    self.check(FailAt::Commit)?;
    self.inner.commit().await
  }

  async fn rollback(self: Box<Self>) -> StoreResult<()> {
    self.inner.rollback().await
  }
}
