// fastcart/app/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::{Page, ProductCreate};
use crate::services::product_service;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub query: Option<String>,
  pub page: Option<i64>,
  pub page_size: Option<i64>,
  pub sort_by: Option<String>,
}

#[instrument(name = "handler::list_products", skip(app_state, query_params), fields(query = ?query_params.query, sort_by = ?query_params.sort_by))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let params = query_params.into_inner();
  let page = Page::from_params(params.page, params.page_size).map_err(AppError::Unprocessable)?;

  let listing = product_service::list_products(
    &app_state.db_pool,
    params.query.as_deref(),
    page,
    params.sort_by.as_deref(),
  )
  .await?;

  Ok(HttpResponse::Ok().json(listing))
}

#[instrument(name = "handler::create_product", skip(app_state, payload))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<ProductCreate>,
) -> Result<HttpResponse, AppError> {
  let product = product_service::create_product(&app_state.db_pool, payload.into_inner()).await?;
  info!(product_id = product.id, "Product {} created.", product.name);
  Ok(HttpResponse::Created().json(product))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product = product_service::get_product(&app_state.db_pool, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(product))
}
