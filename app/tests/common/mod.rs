// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// `TEST_DATABASE_URL`, falling back to `DATABASE_URL`. Tests that need
/// Postgres skip themselves when neither is set.
pub fn test_database_url() -> Option<String> {
  std::env::var("TEST_DATABASE_URL")
    .or_else(|_| std::env::var("DATABASE_URL"))
    .ok()
}

/// A migrated pool, or `None` when no database is configured.
pub async fn test_pool() -> Option<PgPool> {
  let Some(url) = test_database_url() else {
    eprintln!("TEST_DATABASE_URL is not set; skipping Postgres test.");
    return None;
  };
  let pool = PgPoolOptions::new()
    .max_connections(5)
    .connect(&url)
    .await
    .expect("connect to test database");
  fastcart_app::db::migrate(&pool).await.expect("apply migrations");
  Some(pool)
}

static NAME_SEQ: AtomicU64 = AtomicU64::new(0);

/// Inserts a product under a name unique to this test run.
pub async fn seed_product(pool: &PgPool, name: &str, price: Decimal, stock: i32) -> i64 {
  let unique = format!(
    "{} {}-{}",
    name,
    std::process::id(),
    NAME_SEQ.fetch_add(1, Ordering::Relaxed)
  );
  sqlx::query_scalar("INSERT INTO products (name, price, stock) VALUES ($1, $2, $3) RETURNING id")
    .bind(unique)
    .bind(price)
    .bind(stock)
    .fetch_one(pool)
    .await
    .expect("insert product")
}

pub async fn stock_of(pool: &PgPool, product_id: i64) -> i32 {
  sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
    .bind(product_id)
    .fetch_one(pool)
    .await
    .expect("read stock")
}

/// Number of order lines that reference `product_id`.
pub async fn order_lines_for(pool: &PgPool, product_id: i64) -> i64 {
  sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE product_id = $1")
    .bind(product_id)
    .fetch_one(pool)
    .await
    .expect("count order lines")
}
