//! JSON HTTP API for TechFlow support.
//!
//! Exposes an axum [`Router`] backed by any
//! [`techflow_core::store::TicketStore`] plus the two delegation gateways.
//! TLS, tracing layers and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = techflow_api::api_router(state).layer(TraceLayer::new_for_http());
//! ```

pub mod error;
pub mod knowledge;
pub mod support;
pub mod tickets;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use techflow_core::{flag::LiveFlag, store::TicketStore, team::TeamDirectory};
use techflow_delegate::{KnowledgeGateway, SupportResponder};

pub use error::ApiError;

/// Shared handler state.
pub struct AppState<S> {
  pub store:     Arc<S>,
  pub responder: Arc<SupportResponder>,
  pub knowledge: Arc<KnowledgeGateway>,
  pub teams:     Arc<TeamDirectory>,
  /// Whether `/ask` uses the semantic-retrieval service. Read once per
  /// request.
  pub ai_faq:    LiveFlag,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      responder: Arc::clone(&self.responder),
      knowledge: Arc::clone(&self.knowledge),
      teams:     Arc::clone(&self.teams),
      ai_faq:    self.ai_faq.clone(),
    }
  }
}

/// Build a fully-materialised API router over `state`.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: TicketStore + 'static,
{
  Router::new()
    // Tickets
    .route("/tickets", get(tickets::list::<S>).post(tickets::create::<S>))
    .route("/tickets/{id}", get(tickets::get_one::<S>).patch(tickets::update::<S>))
    .route("/tickets/{id}/route", post(tickets::route_one::<S>))
    .route("/teams", get(tickets::teams::<S>))
    // Support delegation
    .route("/ticket", post(support::answer::<S>))
    .route("/health", get(support::health::<S>))
    .route("/metrics", get(support::metrics::<S>))
    // Knowledge
    .route("/ask", post(knowledge::ask::<S>))
    .route("/stats", get(knowledge::stats::<S>))
    .route(
      "/flags/ai-faq",
      get(knowledge::get_flag::<S>).put(knowledge::set_flag::<S>),
    )
    .with_state(state)
}
