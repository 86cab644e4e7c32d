// fastcart/app/src/services/product_service.rs

use crate::errors::{AppError, Result};
use crate::models::{Page, PaginatedResponse, Product, ProductCreate, ProductSummary};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
  Name,
  Price,
}

impl SortColumn {
  fn column(&self) -> &'static str {
    match self {
      SortColumn::Name => "name",
      SortColumn::Price => "price",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
  pub column: SortColumn,
  pub descending: bool,
}

/// Parses `sort_by` such as `"name,-price"`. A leading `-` sorts descending.
pub fn parse_sort(sort_by: Option<&str>) -> Result<Vec<SortKey>> {
  let raw = match sort_by.map(str::trim) {
    Some(raw) if !raw.is_empty() => raw,
    _ => return Ok(Vec::new()),
  };

  raw
    .split(',')
    .map(|field| {
      let field = field.trim();
      let (descending, name) = match field.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, field),
      };
      let column = match name {
        "name" => SortColumn::Name,
        "price" => SortColumn::Price,
        other => return Err(AppError::Validation(format!("Invalid sort field: {}", other))),
      };
      Ok(SortKey { column, descending })
    })
    .collect()
}

/// Builds the ORDER BY list from whitelisted columns; newest first breaks ties.
pub fn order_by_clause(keys: &[SortKey]) -> String {
  let mut parts: Vec<String> = keys
    .iter()
    .map(|key| {
      if key.descending {
        format!("{} DESC NULLS LAST", key.column.column())
      } else {
        format!("{} ASC NULLS FIRST", key.column.column())
      }
    })
    .collect();
  parts.push("created_at DESC".to_string());
  parts.join(", ")
}

fn push_search_filter<'a>(qb: &mut QueryBuilder<'a, Postgres>, search: Option<&'a str>) {
  if let Some(search) = search {
    qb.push(" WHERE search_vector @@ plainto_tsquery('english', ")
      .push_bind(search)
      .push(")");
  }
}

#[instrument(name = "service::list_products", skip(pool, page), fields(page = page.page, page_size = page.page_size))]
pub async fn list_products(
  pool: &PgPool,
  search: Option<&str>,
  page: Page,
  sort_by: Option<&str>,
) -> Result<PaginatedResponse<ProductSummary>> {
  let keys = parse_sort(sort_by)?;
  let search = search.map(str::trim).filter(|s| !s.is_empty());

  let mut select = QueryBuilder::<Postgres>::new("SELECT id, name, price, stock FROM products");
  push_search_filter(&mut select, search);
  select
    .push(" ORDER BY ")
    .push(order_by_clause(&keys))
    .push(" LIMIT ")
    .push_bind(page.page_size)
    .push(" OFFSET ")
    .push_bind(page.offset());
  let products = select.build_query_as::<ProductSummary>().fetch_all(pool).await?;

  let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
  push_search_filter(&mut count, search);
  let (total_records,): (i64,) = count.build_query_as().fetch_one(pool).await?;

  info!(returned = products.len(), total_records, "Products listed.");
  Ok(PaginatedResponse::new(page, total_records, products))
}

#[instrument(name = "service::create_product", skip(pool, payload), fields(name = %payload.name))]
pub async fn create_product(pool: &PgPool, payload: ProductCreate) -> Result<ProductSummary> {
  let payload = payload.normalized();
  payload.validate().map_err(|details| {
    warn!(?details, "Rejected product payload.");
    AppError::Unprocessable(details)
  })?;

  let product: ProductSummary = sqlx::query_as(
    "INSERT INTO products (name, description, price, stock) VALUES ($1, $2, $3, $4) RETURNING id, name, price, stock",
  )
  .bind(&payload.name)
  .bind(&payload.description)
  .bind(payload.price)
  .bind(payload.stock)
  .fetch_one(pool)
  .await?;

  info!(product_id = product.id, "Product created.");
  Ok(product)
}

#[instrument(name = "service::get_product", skip(pool))]
pub async fn get_product(pool: &PgPool, product_id: i64) -> Result<Product> {
  let product: Option<Product> = sqlx::query_as(
    "SELECT id, name, description, price, stock, created_at, updated_at FROM products WHERE id = $1",
  )
  .bind(product_id)
  .fetch_optional(pool)
  .await?;

  product.ok_or_else(|| {
    warn!("Product with ID {} not found.", product_id);
    AppError::NotFound(format!("Product with ID {} not found.", product_id))
  })
}
