//! Handlers for `/tickets` and `/teams`.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/tickets` | Queue order, most urgent first |
//! | `POST`  | `/tickets` | Body: intake fields; `priority` optional |
//! | `GET`   | `/tickets/{id}` | 404 if not found |
//! | `PATCH` | `/tickets/{id}` | Any subset of `status`, `assigned_team`, `assigned_to`, `priority` |
//! | `POST`  | `/tickets/{id}/route` | Body: `{"team_id":"billing"}` |
//! | `GET`   | `/teams` | Known routing targets |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use techflow_core::{
  routing,
  store::TicketStore,
  team::Team,
  ticket::{Ticket, TicketDraft, TicketPatch},
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct TicketBody {
  pub ticket: Ticket,
}

/// Unparseable ids can never name a ticket.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("ticket not found".into()))
}

fn not_found() -> ApiError { ApiError::NotFound("ticket not found".into()) }

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TicketList {
  pub tickets: Vec<Ticket>,
  pub count:   usize,
}

/// `GET /tickets`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<TicketList>, ApiError>
where
  S: TicketStore,
{
  let tickets = state.store.list().await.map_err(ApiError::internal)?;
  Ok(Json(TicketList { count: tickets.len(), tickets }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /tickets`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<TicketDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TicketStore,
{
  let Json(draft) = body?;
  let ticket = state
    .store
    .create(draft.validate()?)
    .await
    .map_err(ApiError::internal)?;
  tracing::info!(number = ticket.number, priority = %ticket.priority, "ticket created");
  Ok((StatusCode::CREATED, Json(TicketBody { ticket })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /tickets/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<TicketBody>, ApiError>
where
  S: TicketStore,
{
  let id = parse_id(&id)?;
  let ticket = state
    .store
    .get(id)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(not_found)?;
  Ok(Json(TicketBody { ticket }))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /tickets/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  body: Result<Json<TicketPatch>, JsonRejection>,
) -> Result<Json<TicketBody>, ApiError>
where
  S: TicketStore,
{
  let id = parse_id(&id)?;
  let Json(patch) = body?;
  let ticket = state
    .store
    .update(id, patch)
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(not_found)?;
  Ok(Json(TicketBody { ticket }))
}

// ─── Route ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RouteBody {
  pub team_id: String,
}

/// `POST /tickets/{id}/route`, body: `{"team_id":"billing"}`
pub async fn route_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  body: Result<Json<RouteBody>, JsonRejection>,
) -> Result<Json<TicketBody>, ApiError>
where
  S: TicketStore,
{
  let id = parse_id(&id)?;
  let Json(body) = body?;
  let ticket = routing::route(state.store.as_ref(), &state.teams, id, &body.team_id).await?;
  tracing::info!(number = ticket.number, team = %body.team_id, "ticket routed");
  Ok(Json(TicketBody { ticket }))
}

// ─── Teams ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TeamList {
  pub teams: Vec<Team>,
}

/// `GET /teams`
pub async fn teams<S>(State(state): State<AppState<S>>) -> Json<TeamList>
where
  S: TicketStore,
{
  Json(TeamList { teams: state.teams.teams().to_vec() })
}
