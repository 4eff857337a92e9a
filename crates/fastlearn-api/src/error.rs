//! Error type and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  Validation(String),
  #[error("{0}")]
  Unauthorized(String),
  #[error("{0}")]
  Forbidden(String),
  #[error("{0}")]
  NotFound(String),
  #[error("{0}")]
  Conflict(String),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a store-layer failure.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::Validation(msg)   => (StatusCode::BAD_REQUEST, msg),
      ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
      ApiError::Forbidden(msg)    => (StatusCode::FORBIDDEN, msg),
      ApiError::NotFound(msg)     => (StatusCode::NOT_FOUND, msg),
      ApiError::Conflict(msg)     => (StatusCode::CONFLICT, msg),
      ApiError::Store(e) => {
        // The caller gets a generic message; the detail goes to the log.
        // Debug builds echo the detail to ease local development.
        tracing::error!(error = %e, "store error");
        let message = if cfg!(debug_assertions) {
          format!("store error: {e}")
        } else {
          "internal server error".to_string()
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message)
      }
    };
    (status, Json(ApiResponse::failure(message))).into_response()
  }
}
