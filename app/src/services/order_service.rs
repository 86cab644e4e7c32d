// fastcart/app/src/services/order_service.rs

use crate::db::PgOrderStore;
use crate::errors::{AppError, Result};
use crate::models::{CreateOrderRequest, OrderSummary, OrderSummaryRow, Page, PaginatedResponse};
use fastcart::{CreatedOrder, OrderBuilder};
use sqlx::PgPool;
use tracing::{info, instrument, warn};

#[instrument(name = "service::create_order", skip(orders, request), fields(lines = request.items.len()))]
pub async fn create_order(orders: &OrderBuilder<PgOrderStore>, request: CreateOrderRequest) -> Result<CreatedOrder> {
  request.validate().map_err(AppError::Unprocessable)?;

  let order = orders.create_order(request.into_requested_items()).await?;
  info!(order_id = order.id, total_price = %order.total_price, "Order placed.");
  Ok(order)
}

#[instrument(name = "service::get_order", skip(orders))]
pub async fn get_order(orders: &OrderBuilder<PgOrderStore>, order_id: i64) -> Result<CreatedOrder> {
  match orders.find_order(order_id).await? {
    Some(order) => Ok(order),
    None => {
      warn!("Order with ID {} not found.", order_id);
      Err(AppError::NotFound(format!("Order with ID {} not found.", order_id)))
    }
  }
}

#[instrument(name = "service::list_orders", skip(pool, page), fields(page = page.page, page_size = page.page_size))]
pub async fn list_orders(pool: &PgPool, page: Page) -> Result<PaginatedResponse<OrderSummary>> {
  let rows: Vec<OrderSummaryRow> = sqlx::query_as(
    r#"
    SELECT o.id, o.total_price, o.status, o.created_at,
           (SELECT COUNT(*) FROM order_items oi WHERE oi.order_id = o.id) AS item_count
    FROM orders o
    ORDER BY o.created_at DESC, o.id DESC
    LIMIT $1 OFFSET $2
    "#,
  )
  .bind(page.page_size)
  .bind(page.offset())
  .fetch_all(pool)
  .await?;

  let (total_records,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders").fetch_one(pool).await?;

  Ok(PaginatedResponse::new(
    page,
    total_records,
    rows.into_iter().map(OrderSummary::from).collect(),
  ))
}
