//! Error types for `techflow-delegate`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("service unavailable: {0}")]
  ServiceUnavailable(#[from] Unavailable),

  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),
}

/// Why a downstream AI service could not produce an answer.
#[derive(Debug, Error)]
pub enum Unavailable {
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("upstream returned {0}")]
  Status(reqwest::StatusCode),

  #[error("malformed response: {0}")]
  Malformed(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reject blank questions before any work is done.
pub(crate) fn require_question(question: &str) -> Result<()> {
  if question.trim().is_empty() {
    return Err(Error::Validation("question cannot be empty".into()));
  }
  Ok(())
}
