//! API error taxonomy and HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use impact_engine::EngineError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("invalid request: {0}")]
  InvalidRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("database: {0}")]
  Database(#[from] sqlx::Error),

  #[error("engine: {0}")]
  Engine(EngineError),
}

impl From<EngineError> for ApiError {
  fn from(e: EngineError) -> Self {
    match e {
      EngineError::Validation { .. } => Self::InvalidRequest(e.to_string()),
      other => Self::Engine(other),
    }
  }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
  error: String,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
      Self::Conflict(_) => StatusCode::CONFLICT,
      Self::Database(_) | Self::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
      error!("request failed: {}", self);
    }

    let body = ErrorBody {
      error: self.to_string(),
    };
    (status, Json(body)).into_response()
  }
}
