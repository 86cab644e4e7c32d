// fastcart/core/src/memory.rs

//! In-process implementation of the store traits.
//!
//! Every product row owns an async mutex that plays the part of a database row
//! lock: a transaction acquires the guards in `lock_products_for_update` and
//! keeps them until it commits, rolls back or is dropped. Writes are staged on
//! the transaction and applied in one step at commit time, so nothing a
//! transaction does is visible to others before it commits.
//!
//! Used by the test suites and benchmarks; it gives the same no-oversell
//! guarantee as the Postgres adapter.

use crate::error::{StoreError, StoreResult};
use crate::model::{
  CreatedOrder, LockedProduct, NewOrder, NewOrderItem, OrderId, OrderLine, OrderStatus, PlacedOrder, ProductId,
  StockUpdate,
};
use crate::store::{OrderStore, OrderTransaction};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex as RowLock, OwnedMutexGuard};
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
  pub id: ProductId,
  pub name: String,
  pub description: Option<String>,
  pub price: Decimal,
  pub stock: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct OrderRecord {
  total_price: Decimal,
  status: OrderStatus,
  created_at: DateTime<Utc>,
  items: Vec<NewOrderItem>,
}

#[derive(Debug, Default)]
struct Tables {
  products: BTreeMap<ProductId, ProductRecord>,
  orders: BTreeMap<OrderId, OrderRecord>,
}

#[derive(Debug)]
struct Shared {
  tables: RwLock<Tables>,
  row_locks: Mutex<HashMap<ProductId, Arc<RowLock<()>>>>,
  next_product_id: AtomicI64,
  next_order_id: AtomicI64,
  lock_timeout: Option<Duration>,
}

impl Shared {
  fn row_lock(&self, id: ProductId) -> Option<Arc<RowLock<()>>> {
    self.row_locks.lock().get(&id).cloned()
  }
}

/// Shared handle to an in-memory inventory and order book. Clones share state.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
  shared: Arc<Shared>,
}

impl Default for InMemoryStore {
  fn default() -> Self {
    Self::new()
  }
}

impl InMemoryStore {
  /// A store whose lock waits never time out.
  pub fn new() -> Self {
    Self::build(None)
  }

  /// A store where waiting longer than `timeout` for a row lock fails the
  /// waiting transaction with a transient error.
  pub fn with_lock_timeout(timeout: Duration) -> Self {
    Self::build(Some(timeout))
  }

  fn build(lock_timeout: Option<Duration>) -> Self {
    Self {
      shared: Arc::new(Shared {
        tables: RwLock::new(Tables::default()),
        row_locks: Mutex::new(HashMap::new()),
        next_product_id: AtomicI64::new(1),
        next_order_id: AtomicI64::new(1),
        lock_timeout,
      }),
    }
  }

  /// Inserts a product and returns its generated id.
  pub fn insert_product(&self, name: impl Into<String>, price: Decimal, stock: i32) -> StoreResult<ProductId> {
    if price <= Decimal::ZERO {
      return Err(StoreError::unexpected(anyhow!("product price must be positive, got {price}")));
    }
    if stock < 0 {
      return Err(StoreError::unexpected(anyhow!("product stock must be non-negative, got {stock}")));
    }

    let id = self.shared.next_product_id.fetch_add(1, Ordering::SeqCst);
    let now = Utc::now();
    let record = ProductRecord {
      id,
      name: name.into(),
      description: None,
      price,
      stock,
      created_at: now,
      updated_at: now,
    };

    self.shared.row_locks.lock().insert(id, Arc::new(RowLock::new(())));
    self.shared.tables.write().products.insert(id, record);
    trace!(product_id = id, "Product inserted.");
    Ok(id)
  }

  pub fn product(&self, id: ProductId) -> Option<ProductRecord> {
    self.shared.tables.read().products.get(&id).cloned()
  }

  pub fn stock_of(&self, id: ProductId) -> Option<i32> {
    self.shared.tables.read().products.get(&id).map(|p| p.stock)
  }

  pub fn order_count(&self) -> usize {
    self.shared.tables.read().orders.len()
  }
}

#[async_trait]
impl OrderStore for InMemoryStore {
  async fn begin(&self) -> StoreResult<Box<dyn OrderTransaction>> {
    Ok(Box::new(InMemoryTransaction {
      shared: Arc::clone(&self.shared),
      held: BTreeMap::new(),
      staged_stock: BTreeMap::new(),
      staged_orders: BTreeMap::new(),
    }))
  }

  async fn find_order(&self, id: OrderId) -> StoreResult<Option<CreatedOrder>> {
    let tables = self.shared.tables.read();
    let Some(order) = tables.orders.get(&id) else {
      return Ok(None);
    };

    let mut items = Vec::with_capacity(order.items.len());
    for item in &order.items {
      let product = tables
        .products
        .get(&item.product_id)
        .ok_or_else(|| StoreError::unexpected(anyhow!("order {id} references unknown product {}", item.product_id)))?;
      items.push(OrderLine {
        product_id: item.product_id,
        product_name: product.name.clone(),
        quantity: item.quantity,
        price: item.unit_price,
      });
    }
    items.sort_by_key(|line| line.product_id);

    Ok(Some(CreatedOrder {
      id,
      total_price: order.total_price,
      status: order.status,
      created_at: order.created_at,
      items,
    }))
  }
}

/// Transaction handle of [`InMemoryStore`]. Dropping it discards staged writes
/// and releases every row lock it holds.
pub struct InMemoryTransaction {
  shared: Arc<Shared>,
  held: BTreeMap<ProductId, OwnedMutexGuard<()>>,
  staged_stock: BTreeMap<ProductId, i32>,
  staged_orders: BTreeMap<OrderId, OrderRecord>,
}

impl InMemoryTransaction {
  async fn acquire(&mut self, id: ProductId, lock: Arc<RowLock<()>>) -> StoreResult<()> {
    let guard = match self.shared.lock_timeout {
      Some(timeout) => tokio::time::timeout(timeout, lock.lock_owned())
        .await
        .map_err(|_| StoreError::transient(anyhow!("lock wait timeout exceeded for product {id}")))?,
      None => lock.lock_owned().await,
    };
    self.held.insert(id, guard);
    Ok(())
  }
}

#[async_trait]
impl OrderTransaction for InMemoryTransaction {
  async fn lock_products_for_update(&mut self, ids: &[ProductId]) -> StoreResult<HashMap<ProductId, LockedProduct>> {
    let wanted: BTreeSet<ProductId> = ids.iter().copied().collect();

    for &id in &wanted {
      if self.held.contains_key(&id) {
        continue;
      }
      if let Some(lock) = self.shared.row_lock(id) {
        self.acquire(id, lock).await?;
      }
    }

    let tables = self.shared.tables.read();
    let rows = wanted
      .iter()
      .filter(|id| self.held.contains_key(*id))
      .filter_map(|id| tables.products.get(id))
      .map(|product| {
        let stock = self.staged_stock.get(&product.id).copied().unwrap_or(product.stock);
        (
          product.id,
          LockedProduct {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            stock,
          },
        )
      })
      .collect();
    debug!(held = self.held.len(), "Row locks held by transaction.");
    Ok(rows)
  }

  async fn update_stocks(&mut self, updates: &[StockUpdate]) -> StoreResult<()> {
    for update in updates {
      if !self.held.contains_key(&update.id) {
        return Err(StoreError::unexpected(anyhow!(
          "stock update for product {} without holding its row lock",
          update.id
        )));
      }
      if update.new_stock < 0 {
        return Err(StoreError::unexpected(anyhow!(
          "stock for product {} would become negative ({})",
          update.id,
          update.new_stock
        )));
      }
    }
    for update in updates {
      self.staged_stock.insert(update.id, update.new_stock);
    }
    Ok(())
  }

  async fn insert_order(&mut self, order: &NewOrder) -> StoreResult<PlacedOrder> {
    if order.total_price <= Decimal::ZERO {
      return Err(StoreError::unexpected(anyhow!(
        "order total must be positive, got {}",
        order.total_price
      )));
    }

    let id = self.shared.next_order_id.fetch_add(1, Ordering::SeqCst);
    let created_at = Utc::now();
    self.staged_orders.insert(
      id,
      OrderRecord {
        total_price: order.total_price,
        status: order.status,
        created_at,
        items: Vec::new(),
      },
    );
    Ok(PlacedOrder { id, created_at })
  }

  async fn insert_order_items(&mut self, items: &[NewOrderItem]) -> StoreResult<()> {
    {
      let tables = self.shared.tables.read();
      let mut keys: BTreeSet<(OrderId, ProductId)> = BTreeSet::new();
      for item in items {
        let Some(order) = self.staged_orders.get(&item.order_id) else {
          return Err(StoreError::unexpected(anyhow!("order {} does not exist", item.order_id)));
        };
        if !tables.products.contains_key(&item.product_id) {
          return Err(StoreError::unexpected(anyhow!("product {} does not exist", item.product_id)));
        }
        if item.quantity <= 0 || item.unit_price <= Decimal::ZERO {
          return Err(StoreError::unexpected(anyhow!(
            "order item for product {} must have positive quantity and unit price",
            item.product_id
          )));
        }
        let duplicate = order.items.iter().any(|existing| existing.product_id == item.product_id);
        if duplicate || !keys.insert((item.order_id, item.product_id)) {
          return Err(StoreError::unexpected(anyhow!(
            "duplicate order item ({}, {})",
            item.order_id,
            item.product_id
          )));
        }
      }
    }

    for item in items {
      if let Some(order) = self.staged_orders.get_mut(&item.order_id) {
        order.items.push(*item);
      }
    }
    Ok(())
  }

  async fn commit(self: Box<Self>) -> StoreResult<()> {
    let InMemoryTransaction {
      shared,
      held,
      staged_stock,
      staged_orders,
    } = *self;

    {
      let mut tables = shared.tables.write();
      let now = Utc::now();
      for (id, stock) in staged_stock {
        if let Some(product) = tables.products.get_mut(&id) {
          product.stock = stock;
          product.updated_at = now;
        }
      }
      tables.orders.extend(staged_orders);
    }

    // Row locks are released only once the writes are visible.
    drop(held);
    Ok(())
  }

  async fn rollback(self: Box<Self>) -> StoreResult<()> {
    trace!(held = self.held.len(), "Discarding in-memory transaction.");
    Ok(())
  }
}
