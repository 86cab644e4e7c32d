// fastcart/app/src/services/seed_service.rs

//! Startup data seeding. Products are bulk inserted; orders go through the
//! real order builder so stock and totals stay consistent.

use crate::db::PgOrderStore;
use anyhow::{bail, Context, Result};
use fastcart::{OrderBuilder, OrderError, RequestedItem};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info, instrument};

const PRODUCT_BATCH_SIZE: usize = 500;
const ORDER_PRODUCT_POOL: i64 = 1000;

const ADJECTIVES: [&str; 8] = ["Compact", "Durable", "Classic", "Portable", "Premium", "Everyday", "Modern", "Rugged"];
const NOUNS: [&str; 8] = ["backpack", "kettle", "desk lamp", "headset", "notebook", "water bottle", "chair", "blender"];

struct SeedProduct {
  name: String,
  description: String,
  price: Decimal,
  stock: i32,
}

fn generate_products(start: usize, count: usize) -> Vec<SeedProduct> {
  let mut rng = rand::thread_rng();
  (start..start + count)
    .map(|i| {
      let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("Classic");
      let noun = NOUNS.choose(&mut rng).copied().unwrap_or("notebook");
      SeedProduct {
        name: format!("Product {}", i + 1),
        description: format!("{} {} for everyday use.", adjective, noun),
        price: Decimal::new(rng.gen_range(500..=50_000), 2),
        stock: rng.gen_range(10..=100),
      }
    })
    .collect()
}

fn generate_order_lines(product_ids: &[i64]) -> Vec<RequestedItem> {
  let mut rng = rand::thread_rng();
  let lines = rng.gen_range(1..=5);
  let mut items = Vec::with_capacity(lines);
  for _ in 0..lines {
    if let Some(&id) = product_ids.choose(&mut rng) {
      items.push(RequestedItem::new(id, rng.gen_range(1..=10)));
    }
  }
  items
}

async fn table_has_rows(pool: &PgPool, table: &str) -> Result<bool> {
  let (exists,): (bool,) = sqlx::query_as(&format!("SELECT EXISTS (SELECT 1 FROM {})", table))
    .fetch_one(pool)
    .await?;
  Ok(exists)
}

#[instrument(name = "seed::products", skip(pool))]
pub async fn seed_products(pool: &PgPool, n: usize, clear_existing: bool) -> Result<()> {
  if clear_existing {
    sqlx::query("TRUNCATE order_items, orders, products RESTART IDENTITY")
      .execute(pool)
      .await
      .context("clearing products")?;
  } else if table_has_rows(pool, "products").await? {
    info!("Database already contains products, skipping product seeding.");
    return Ok(());
  }

  let mut seeded = 0;
  while seeded < n {
    let batch = generate_products(seeded, PRODUCT_BATCH_SIZE.min(n - seeded));

    let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO products (name, description, price, stock) ");
    qb.push_values(&batch, |mut row, p| {
      row
        .push_bind(p.name.clone())
        .push_bind(p.description.clone())
        .push_bind(p.price)
        .push_bind(p.stock);
    });
    qb.build().execute(pool).await.context("inserting product batch")?;

    seeded += batch.len();
    info!("Seeded batch with {} products.", batch.len());
  }
  info!("Seeded all {} products.", n);
  Ok(())
}

#[instrument(name = "seed::orders", skip(pool, orders))]
pub async fn seed_orders(
  pool: &PgPool,
  orders: &OrderBuilder<PgOrderStore>,
  n: usize,
  clear_existing: bool,
) -> Result<()> {
  if clear_existing {
    sqlx::query("DELETE FROM orders").execute(pool).await.context("clearing orders")?;
  } else if table_has_rows(pool, "orders").await? {
    info!("Database already contains orders, skipping order seeding.");
    return Ok(());
  }

  let product_ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM products ORDER BY id LIMIT $1")
    .bind(ORDER_PRODUCT_POOL)
    .fetch_all(pool)
    .await?;
  if product_ids.is_empty() {
    bail!("no products found to build orders from");
  }

  let mut placed = 0;
  let mut skipped = 0;
  for _ in 0..n {
    match orders.create_order(generate_order_lines(&product_ids)).await {
      Ok(_) => placed += 1,
      // Seeded stock runs out eventually; those orders are expected to fail.
      Err(OrderError::Validation(reason)) => {
        debug!(%reason, "Skipping seeded order.");
        skipped += 1;
      }
      Err(err) => return Err(anyhow::Error::new(err).context("placing seeded order")),
    }
  }
  info!(placed, skipped, "Seeded orders.");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn generated_products_respect_column_rules() {
    let products = generate_products(0, 50);
    assert_eq!(products.len(), 50);
    assert_eq!(products[0].name, "Product 1");
    for p in &products {
      assert!(p.price >= Decimal::new(500, 2) && p.price <= Decimal::new(50_000, 2));
      assert!((10..=100).contains(&p.stock));
      assert!(p.description.len() <= 500);
    }
  }

  #[test]
  fn generated_order_lines_reference_known_products() {
    let ids = [3, 5, 8];
    for _ in 0..20 {
      let lines = generate_order_lines(&ids);
      assert!((1..=5).contains(&lines.len()));
      assert!(lines.iter().all(|l| ids.contains(&l.product_id) && (1..=10).contains(&l.quantity)));
    }
  }
}
