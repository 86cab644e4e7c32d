// fastcart/app/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Debug, Clone)] // Clone is useful if parts of config are passed around
pub struct AppConfig {
  pub app_name: String,
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub db_max_connections: u32,

  // Applied per order transaction with `SET LOCAL lock_timeout`; None disables it.
  pub order_lock_timeout: Option<Duration>,

  pub run_migrations: bool,
  pub log_format: LogFormat,

  // Optional: for seeding DB on startup
  pub seed_db: bool,
  pub seed_products: usize,
  pub seed_orders: usize,
  pub seed_clear_existing: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from any variable source. `from_env` passes the
  /// process environment; tests pass a map.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

    let app_name = get_or("APP_NAME", "FastCart API");
    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = parse_var("SERVER_PORT", &get_or("SERVER_PORT", "8080"))?;

    let database_url = match lookup("DATABASE_URL") {
      Some(url) => url,
      None => format!(
        "postgres://{}:{}@{}:{}/{}",
        get_or("DB_USER", "postgres"),
        get_or("DB_PASSWORD", "postgres"),
        get_or("DB_HOST", "localhost"),
        get_or("DB_PORT", "5432"),
        get_or("DB_NAME", "fastcartdb"),
      ),
    };
    let db_max_connections = parse_var("DB_MAX_CONNECTIONS", &get_or("DB_MAX_CONNECTIONS", "10"))?;

    let lock_timeout_ms: u64 = parse_var("ORDER_LOCK_TIMEOUT_MS", &get_or("ORDER_LOCK_TIMEOUT_MS", "5000"))?;
    let order_lock_timeout = (lock_timeout_ms > 0).then(|| Duration::from_millis(lock_timeout_ms));

    let run_migrations = parse_var("RUN_MIGRATIONS", &get_or("RUN_MIGRATIONS", "true"))?;
    let log_format = match get_or("LOG_FORMAT", "pretty").to_ascii_lowercase().as_str() {
      "pretty" | "text" => LogFormat::Pretty,
      "json" => LogFormat::Json,
      other => return Err(AppError::Config(format!("Invalid LOG_FORMAT: {}", other))),
    };

    let seed_db = parse_var("SEED_DB", &get_or("SEED_DB", "false"))?;
    let seed_products = parse_var("SEED_PRODUCTS", &get_or("SEED_PRODUCTS", "200"))?;
    let seed_orders = parse_var("SEED_ORDERS", &get_or("SEED_ORDERS", "200"))?;
    let seed_clear_existing = parse_var("SEED_CLEAR_EXISTING", &get_or("SEED_CLEAR_EXISTING", "false"))?;

    Ok(Self {
      app_name,
      server_host,
      server_port,
      database_url,
      db_max_connections,
      order_lock_timeout,
      run_migrations,
      log_format,
      seed_db,
      seed_products,
      seed_orders,
      seed_clear_existing,
    })
  }

  pub fn server_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  raw
    .trim()
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", name, raw, e)))
}
