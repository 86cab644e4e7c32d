// fastcart/app/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use fastcart::OrderError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  /// Field-level payload problems, rendered as `{"detail": [...]}` with 422.
  #[error("Unprocessable Entity: {}", .0.join("; "))]
  Unprocessable(Vec<String>),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Order Error: {0}")]
  Order(#[from] OrderError),

  #[error("Internal Server Error: {0}")]
  Internal(String), // For miscellaneous errors
}

// Handlers and services use `?` on anyhow results (seeding, migrations).
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(err) => AppError::Internal(format!("{:#}", err)),
    }
  }
}

impl From<sqlx::migrate::MigrateError> for AppError {
  fn from(err: sqlx::migrate::MigrateError) -> Self {
    AppError::Internal(format!("Migration failed: {}", err))
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Order(OrderError::Validation(_)) => StatusCode::BAD_REQUEST,
      AppError::Order(OrderError::Transient { .. }) => StatusCode::SERVICE_UNAVAILABLE,
      AppError::Order(OrderError::Internal { .. })
      | AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      // Keep the cause chain in the logs; the body stays opaque.
      tracing::error!(application_error = %self, cause = ?std::error::Error::source(self), "Responding with error");
    } else {
      tracing::info!(application_error = %self, status = status.as_u16(), "Rejecting request");
    }

    let mut builder = HttpResponse::build(status);
    match self {
      AppError::Validation(m) | AppError::NotFound(m) => builder.json(json!({"error": m})),
      AppError::Unprocessable(details) => builder.json(json!({"detail": details})),
      AppError::Order(order_err) => builder.json(json!({"error": order_err.to_string()})),
      AppError::Config(_) => builder.json(json!({"error": "Configuration issue"})),
      AppError::Sqlx(_) => builder.json(json!({"error": "Database operation failed"})),
      AppError::Internal(_) => builder.json(json!({"error": "An internal error occurred"})),
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
