// fastcart/app/src/main.rs

use fastcart_app::config::{AppConfig, LogFormat};
use fastcart_app::errors::Result as AppResult; // Use the app's Result alias
use fastcart_app::state::AppState;
use fastcart_app::{db, services, web};

use actix_web::{web as actix_data, App, HttpServer}; // Renamed web to actix_data
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  // RUST_LOG overrides the default level.
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration

  match format {
    LogFormat::Pretty => builder.init(),
    LogFormat::Json => builder.json().init(),
  }
}

async fn prepare_database(app_config: &AppConfig, app_state: &AppState) -> AppResult<()> {
  if app_config.run_migrations {
    db::migrate(&app_state.db_pool).await?;
  }

  if app_config.seed_db {
    tracing::info!(
      products = app_config.seed_products,
      orders = app_config.seed_orders,
      clear_existing = app_config.seed_clear_existing,
      "Seeding database."
    );
    services::seed_service::seed_products(
      &app_state.db_pool,
      app_config.seed_products,
      app_config.seed_clear_existing,
    )
    .await?;
    services::seed_service::seed_orders(
      &app_state.db_pool,
      &app_state.orders,
      app_config.seed_orders,
      app_config.seed_clear_existing,
    )
    .await?;
  }
  Ok(())
}

// Main function
#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Load application configuration
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg), // Arc the config for sharing
    Err(e) => {
      eprintln!("Failed to load application configuration: {}", e);
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  init_tracing(app_config.log_format);
  tracing::info!(app_name = %app_config.app_name, "Starting FastCart server...");

  // Initialize Database Pool
  let db_pool = match db::connect(&app_config).await {
    Ok(pool) => pool,
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  };

  // Create AppState
  let app_state = AppState::new(db_pool, app_config.clone());

  if let Err(e) = prepare_database(&app_config, &app_state).await {
    tracing::error!(error = %e, "Failed to prepare the database.");
    return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
  }

  // Configure and Start Actix Web Server
  let server_address = app_config.server_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_extractors)
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
