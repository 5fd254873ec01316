//! Support delegation endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/ticket` | Body: `{"question":"...","user_email":"..."}`; never fails for downstream reasons |
//! | `GET`  | `/health` | Flag state |
//! | `GET`  | `/metrics` | Tallies of answers served so far |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use techflow_core::{
  answer::{AnswerMode, SupportAnswer},
  store::TicketStore,
};
use techflow_delegate::{MetricsSummary, responder::DEFAULT_USER_EMAIL};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct QuestionBody {
  #[serde(default)]
  pub question:   String,
  pub user_email: Option<String>,
}

/// `POST /ticket`
pub async fn answer<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<QuestionBody>, JsonRejection>,
) -> Result<Json<SupportAnswer>, ApiError>
where
  S: TicketStore,
{
  let Json(body) = body?;
  let email = body.user_email.as_deref().unwrap_or(DEFAULT_USER_EMAIL);
  let answer = state.responder.answer(&body.question, Some(email)).await?;
  Ok(Json(answer))
}

#[derive(Debug, Serialize)]
pub struct Health {
  pub status:         &'static str,
  pub service:        &'static str,
  pub ai_enabled:     bool,
  pub ai_faq_enabled: bool,
  /// Mode the support responder answers in.
  pub mode:           AnswerMode,
}

/// `GET /health`
pub async fn health<S>(State(state): State<AppState<S>>) -> Json<Health>
where
  S: TicketStore,
{
  let ai_enabled = state.responder.ai_enabled();
  Json(Health {
    status: "healthy",
    service: "techflow",
    ai_enabled,
    ai_faq_enabled: state.ai_faq.get(),
    mode: if ai_enabled { AnswerMode::Ai } else { AnswerMode::Manual },
  })
}

#[derive(Debug, Serialize)]
pub struct Metrics {
  pub summary: MetricsSummary,
}

/// `GET /metrics`
pub async fn metrics<S>(State(state): State<AppState<S>>) -> Json<Metrics>
where
  S: TicketStore,
{
  Json(Metrics { summary: state.responder.ledger().summary() })
}
