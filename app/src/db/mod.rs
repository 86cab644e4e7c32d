// fastcart/app/src/db/mod.rs

//! Connection pool, migrations and the Postgres implementation of the order
//! store.

pub mod order_store;

pub use order_store::PgOrderStore;

use crate::config::AppConfig;
use crate::errors::Result;
use fastcart::StoreError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{info, instrument};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// SQLSTATE codes worth retrying from the client side.
const TRANSIENT_SQLSTATES: [&str; 5] = [
  "55P03", // lock_not_available
  "40P01", // deadlock_detected
  "40001", // serialization_failure
  "57014", // query_canceled (statement or lock timeout)
  "53300", // too_many_connections
];

#[instrument(name = "db::connect", skip(config), fields(max_connections = config.db_max_connections))]
pub async fn connect(config: &AppConfig) -> Result<PgPool> {
  let pool = PgPoolOptions::new()
    .max_connections(config.db_max_connections)
    .acquire_timeout(Duration::from_secs(10))
    .connect(&config.database_url)
    .await?;
  info!("Successfully connected to the database.");
  Ok(pool)
}

#[instrument(name = "db::migrate", skip(pool))]
pub async fn migrate(pool: &PgPool) -> Result<()> {
  MIGRATOR.run(pool).await?;
  info!("Database migrations applied.");
  Ok(())
}

/// Sorts a driver error into the core's transient/unexpected split.
pub fn classify_sqlx_error(err: sqlx::Error) -> StoreError {
  if is_transient(&err) {
    StoreError::transient(err)
  } else {
    StoreError::unexpected(err)
  }
}

fn is_transient(err: &sqlx::Error) -> bool {
  match err {
    sqlx::Error::Database(db_err) => db_err
      .code()
      // Class 08 is connection_exception.
      .map(|code| code.starts_with("08") || TRANSIENT_SQLSTATES.contains(&code.as_ref()))
      .unwrap_or(false),
    sqlx::Error::PoolTimedOut
    | sqlx::Error::PoolClosed
    | sqlx::Error::Io(_)
    | sqlx::Error::Tls(_)
    | sqlx::Error::Protocol(_) => true,
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pool_and_connection_failures_are_transient() {
    assert!(classify_sqlx_error(sqlx::Error::PoolTimedOut).is_transient());
    assert!(classify_sqlx_error(sqlx::Error::PoolClosed).is_transient());
    assert!(classify_sqlx_error(sqlx::Error::Protocol("unexpected eof".into())).is_transient());
    let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
    assert!(classify_sqlx_error(sqlx::Error::Io(io)).is_transient());
  }

  #[test]
  fn other_failures_are_unexpected() {
    assert!(!classify_sqlx_error(sqlx::Error::RowNotFound).is_transient());
    assert!(!classify_sqlx_error(sqlx::Error::ColumnNotFound("stock".into())).is_transient());
  }
}
