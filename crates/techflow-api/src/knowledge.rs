//! Knowledge endpoints and the live FAQ flag.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/ask` | Body: `{"question":"..."}`; 503 if the AI service fails |
//! | `GET`  | `/stats` | Summary of the current mode |
//! | `GET`  | `/flags/ai-faq` | `{"enabled":bool}` |
//! | `PUT`  | `/flags/ai-faq` | Body: `{"enabled":bool}` |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use techflow_core::{
  answer::{AnswerMode, KnowledgeAnswer},
  flag::deserialize_flag,
  store::TicketStore,
};
use techflow_delegate::KnowledgeStats;

use crate::{AppState, error::ApiError};

fn current_mode<S>(state: &AppState<S>) -> AnswerMode {
  if state.ai_faq.get() { AnswerMode::Ai } else { AnswerMode::Manual }
}

#[derive(Debug, Deserialize)]
pub struct AskBody {
  #[serde(default)]
  pub question: String,
}

/// `POST /ask`
pub async fn ask<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<AskBody>, JsonRejection>,
) -> Result<Json<KnowledgeAnswer>, ApiError>
where
  S: TicketStore,
{
  let Json(body) = body?;
  let mode = current_mode(&state);
  let answer = state.knowledge.ask(&body.question, mode).await?;
  Ok(Json(answer))
}

/// `GET /stats`
pub async fn stats<S>(State(state): State<AppState<S>>) -> Json<KnowledgeStats>
where
  S: TicketStore,
{
  Json(state.knowledge.stats(current_mode(&state)))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FlagBody {
  #[serde(deserialize_with = "deserialize_flag")]
  pub enabled: bool,
}

/// `GET /flags/ai-faq`
pub async fn get_flag<S>(State(state): State<AppState<S>>) -> Json<FlagBody>
where
  S: TicketStore,
{
  Json(FlagBody { enabled: state.ai_faq.get() })
}

/// `PUT /flags/ai-faq`
pub async fn set_flag<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<FlagBody>, JsonRejection>,
) -> Result<Json<FlagBody>, ApiError>
where
  S: TicketStore,
{
  let Json(body) = body?;
  state.ai_faq.set(body.enabled);
  tracing::info!(enabled = body.enabled, "ai faq flag changed");
  Ok(Json(body))
}
