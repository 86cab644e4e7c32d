// fastcart/app/src/db/order_store.rs

use super::classify_sqlx_error;
use crate::models::DbOrderStatus;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fastcart::{
  CreatedOrder, LockedProduct, NewOrder, NewOrderItem, OrderId, OrderLine, OrderStatus, OrderStore, OrderTransaction,
  PlacedOrder, ProductId, StockUpdate, StoreError, StoreResult,
};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// [`OrderStore`] backed by a Postgres pool. Each order runs in one database
/// transaction; rows are locked with `SELECT ... FOR UPDATE` in ascending id
/// order so overlapping orders queue instead of deadlocking.
#[derive(Debug, Clone)]
pub struct PgOrderStore {
  pool: PgPool,
  lock_timeout: Option<Duration>,
}

impl PgOrderStore {
  pub fn new(pool: PgPool, lock_timeout: Option<Duration>) -> Self {
    Self { pool, lock_timeout }
  }
}

pub struct PgOrderTransaction {
  tx: Transaction<'static, Postgres>,
}

#[derive(FromRow)]
struct LockedRow {
  id: i64,
  name: String,
  price: Decimal,
  stock: i32,
}

#[derive(FromRow)]
struct OrderHeaderRow {
  id: i64,
  total_price: Decimal,
  status: DbOrderStatus,
  created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct OrderLineRow {
  product_id: i64,
  product_name: String,
  quantity: i32,
  price: Decimal,
}

#[async_trait]
impl OrderStore for PgOrderStore {
  async fn begin(&self) -> StoreResult<Box<dyn OrderTransaction>> {
    let mut tx = self.pool.begin().await.map_err(classify_sqlx_error)?;

    if let Some(timeout) = self.lock_timeout {
      // SET cannot take bind parameters; set_config with is_local = true is the same as SET LOCAL.
      sqlx::query("SELECT set_config('lock_timeout', $1, true)")
        .bind(format!("{}ms", timeout.as_millis()))
        .execute(&mut *tx)
        .await
        .map_err(classify_sqlx_error)?;
    }

    Ok(Box::new(PgOrderTransaction { tx }))
  }

  #[instrument(name = "pg_store::find_order", skip(self))]
  async fn find_order(&self, id: OrderId) -> StoreResult<Option<CreatedOrder>> {
    let header = sqlx::query_as::<_, OrderHeaderRow>(
      "SELECT id, total_price, status, created_at FROM orders WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await
    .map_err(classify_sqlx_error)?;

    let Some(header) = header else {
      return Ok(None);
    };

    let lines = sqlx::query_as::<_, OrderLineRow>(
      r#"
      SELECT oi.product_id, p.name AS product_name, oi.quantity, oi.unit_price AS price
      FROM order_items oi
      JOIN products p ON p.id = oi.product_id
      WHERE oi.order_id = $1
      ORDER BY oi.product_id
      "#,
    )
    .bind(id)
    .fetch_all(&self.pool)
    .await
    .map_err(classify_sqlx_error)?;

    Ok(Some(CreatedOrder {
      id: header.id,
      total_price: header.total_price,
      status: OrderStatus::from(header.status),
      created_at: header.created_at,
      items: lines
        .into_iter()
        .map(|row| OrderLine {
          product_id: row.product_id,
          product_name: row.product_name,
          quantity: row.quantity,
          price: row.price,
        })
        .collect(),
    }))
  }
}

#[async_trait]
impl OrderTransaction for PgOrderTransaction {
  #[instrument(name = "pg_store::lock_products", skip(self, ids), fields(count = ids.len()))]
  async fn lock_products_for_update(&mut self, ids: &[ProductId]) -> StoreResult<HashMap<ProductId, LockedProduct>> {
    let rows = sqlx::query_as::<_, LockedRow>(
      "SELECT id, name, price, stock FROM products WHERE id = ANY($1) ORDER BY id FOR UPDATE",
    )
    .bind(ids)
    .fetch_all(&mut *self.tx)
    .await
    .map_err(classify_sqlx_error)?;

    debug!(locked = rows.len(), "Product rows locked.");
    Ok(
      rows
        .into_iter()
        .map(|row| {
          (
            row.id,
            LockedProduct {
              id: row.id,
              name: row.name,
              price: row.price,
              stock: row.stock,
            },
          )
        })
        .collect(),
    )
  }

  async fn update_stocks(&mut self, updates: &[StockUpdate]) -> StoreResult<()> {
    let ids: Vec<i64> = updates.iter().map(|u| u.id).collect();
    let stocks: Vec<i32> = updates.iter().map(|u| u.new_stock).collect();

    let result = sqlx::query(
      r#"
      UPDATE products AS p
      SET stock = u.new_stock, updated_at = NOW()
      FROM UNNEST($1::bigint[], $2::int[]) AS u(id, new_stock)
      WHERE p.id = u.id
      "#,
    )
    .bind(ids)
    .bind(stocks)
    .execute(&mut *self.tx)
    .await
    .map_err(classify_sqlx_error)?;

    if result.rows_affected() != updates.len() as u64 {
      return Err(StoreError::unexpected(anyhow::anyhow!(
        "stock update touched {} rows, expected {}",
        result.rows_affected(),
        updates.len()
      )));
    }
    Ok(())
  }

  async fn insert_order(&mut self, order: &NewOrder) -> StoreResult<PlacedOrder> {
    let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
      "INSERT INTO orders (total_price, status) VALUES ($1, $2) RETURNING id, created_at",
    )
    .bind(order.total_price)
    .bind(DbOrderStatus::from(order.status))
    .fetch_one(&mut *self.tx)
    .await
    .map_err(classify_sqlx_error)?;

    Ok(PlacedOrder { id, created_at })
  }

  async fn insert_order_items(&mut self, items: &[NewOrderItem]) -> StoreResult<()> {
    let order_ids: Vec<i64> = items.iter().map(|i| i.order_id).collect();
    let product_ids: Vec<i64> = items.iter().map(|i| i.product_id).collect();
    let quantities: Vec<i32> = items.iter().map(|i| i.quantity).collect();
    let unit_prices: Vec<Decimal> = items.iter().map(|i| i.unit_price).collect();

    sqlx::query(
      r#"
      INSERT INTO order_items (order_id, product_id, quantity, unit_price)
      SELECT * FROM UNNEST($1::bigint[], $2::bigint[], $3::int[], $4::numeric[])
      "#,
    )
    .bind(order_ids)
    .bind(product_ids)
    .bind(quantities)
    .bind(unit_prices)
    .execute(&mut *self.tx)
    .await
    .map_err(classify_sqlx_error)?;
    Ok(())
  }

  async fn commit(self: Box<Self>) -> StoreResult<()> {
    self.tx.commit().await.map_err(classify_sqlx_error)
  }

  async fn rollback(self: Box<Self>) -> StoreResult<()> {
    self.tx.rollback().await.map_err(classify_sqlx_error)
  }
}
