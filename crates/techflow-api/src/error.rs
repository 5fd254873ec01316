//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  NotFound(String),

  #[error("service unavailable: {0}")]
  ServiceUnavailable(String),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a backend failure.
  pub fn internal<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Internal(Box::new(e))
  }
}

impl From<techflow_core::Error> for ApiError {
  fn from(e: techflow_core::Error) -> Self {
    use techflow_core::Error as E;
    match e {
      E::Validation(m) => ApiError::Validation(m),
      E::TicketNotFound(_) => ApiError::NotFound("ticket not found".into()),
      E::TeamNotFound(id) => ApiError::NotFound(format!("team {id:?} not found")),
      E::Store(inner) => ApiError::Internal(inner),
    }
  }
}

impl From<techflow_delegate::Error> for ApiError {
  fn from(e: techflow_delegate::Error) -> Self {
    use techflow_delegate::Error as E;
    match e {
      E::Validation(m) => ApiError::Validation(m),
      E::ServiceUnavailable(u) => ApiError::ServiceUnavailable(u.to_string()),
      e @ E::Client(_) => ApiError::internal(e),
    }
  }
}

/// Malformed or mistyped JSON bodies are validation failures.
impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::Validation(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
