// fastcart/app/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::errors::AppError;
use crate::models::{CreateOrderRequest, Page, PageQuery};
use crate::services::order_service;
use crate::state::AppState;

#[instrument(
  name = "handler::create_order",
  skip(app_state, payload),
  fields(app = %app_state.config.app_name, lines = payload.items.len())
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
  let order = order_service::create_order(&app_state.orders, payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(order))
}

#[instrument(name = "handler::get_order", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let order = order_service::get_order(&app_state.orders, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(order))
}

#[instrument(name = "handler::list_orders", skip(app_state, query_params))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
  let page = Page::from_params(query_params.page, query_params.page_size).map_err(AppError::Unprocessable)?;
  let listing = order_service::list_orders(&app_state.db_pool, page).await?;
  Ok(HttpResponse::Ok().json(listing))
}
