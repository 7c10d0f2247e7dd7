//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use census_core::Error;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  /// The inbound request deadline passed before a response was ready.
  #[error("request timed out")]
  Timeout,

  /// A middleware failure with no finer classification.
  #[error("internal error: {0}")]
  Internal(String),

  #[error(transparent)]
  Service(#[from] Error),
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
      ApiError::Service(e) if e.is_validation() => StatusCode::BAD_REQUEST,
      ApiError::Service(Error::PersonNotFound(_)) => StatusCode::NOT_FOUND,
      ApiError::Service(Error::Enrichment { .. }) => StatusCode::BAD_GATEWAY,
      ApiError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    // Storage failures are logged in full but reported opaquely.
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
      tracing::error!(error = %self, "request failed");
      "internal error".to_owned()
    } else {
      tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
      self.to_string()
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
