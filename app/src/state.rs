// fastcart/app/src/state.rs
use crate::config::AppConfig;
use crate::db::PgOrderStore;
use fastcart::OrderBuilder;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub orders: Arc<OrderBuilder<PgOrderStore>>,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  pub fn new(db_pool: PgPool, config: Arc<AppConfig>) -> Self {
    let store = PgOrderStore::new(db_pool.clone(), config.order_lock_timeout);
    Self {
      db_pool,
      orders: Arc::new(OrderBuilder::new(store)),
      config,
    }
  }
}
