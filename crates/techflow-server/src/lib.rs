//! Wiring for the `techflow` server binary: configuration, application
//! state and sample-data seeding.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use axum::Router;
use serde::Deserialize;
use techflow_api::AppState;
use techflow_core::{catalog, flag::{LiveFlag, deserialize_flag}, store::TicketStore};
use techflow_delegate::{KnowledgeConfig, KnowledgeGateway, ResponderConfig, SupportResponder};
use techflow_store_sqlite::SqliteStore;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `techflow.toml` and
/// `TECHFLOW_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub store_path:           PathBuf,
  pub support_bot_url:      String,
  pub faq_url:              String,
  /// Fixed for the process lifetime.
  #[serde(deserialize_with = "deserialize_flag")]
  pub ai_support_enabled:   bool,
  /// Initial value only; toggled at runtime through `/flags/ai-faq`.
  #[serde(deserialize_with = "deserialize_flag")]
  pub ai_faq_enabled:       bool,
  pub request_timeout_secs: u64,
  #[serde(deserialize_with = "deserialize_flag")]
  pub seed_sample_data:     bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "0.0.0.0".into(),
      port:                 3000,
      store_path:           PathBuf::from("techflow.db"),
      support_bot_url:      "http://support-bot:8001".into(),
      faq_url:              "http://faq-expert:8002".into(),
      ai_support_enabled:   false,
      ai_faq_enabled:       false,
      request_timeout_secs: 10,
      seed_sample_data:     false,
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `TECHFLOW_*` variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("TECHFLOW"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Application state ────────────────────────────────────────────────────────

/// Build handler state for `store` from `cfg`.
pub fn build_state(cfg: &ServerConfig, store: SqliteStore) -> anyhow::Result<AppState<SqliteStore>> {
  let timeout = cfg.request_timeout();

  let responder = SupportResponder::new(ResponderConfig {
    enabled: cfg.ai_support_enabled,
    base_url: cfg.support_bot_url.clone(),
    timeout,
  })
  .context("failed to build support responder")?;

  let knowledge = KnowledgeGateway::new(
    KnowledgeConfig { base_url: cfg.faq_url.clone(), timeout },
    catalog::knowledge_base(),
  )
  .context("failed to build knowledge gateway")?;

  Ok(AppState {
    store:     Arc::new(store),
    responder: Arc::new(responder),
    knowledge: Arc::new(knowledge),
    teams:     Arc::new(catalog::teams()),
    ai_faq:    LiveFlag::new(cfg.ai_faq_enabled),
  })
}

/// The full HTTP application, with request tracing.
pub fn app(state: AppState<SqliteStore>) -> Router {
  techflow_api::api_router(state).layer(TraceLayer::new_for_http())
}

/// Load the sample queue into `store` if it holds no tickets.
///
/// Returns the number of tickets imported.
pub async fn seed_if_empty(store: &SqliteStore) -> anyhow::Result<usize> {
  if store.count().await.context("failed to count tickets")? > 0 {
    return Ok(0);
  }
  let queue = catalog::sample_queue(chrono::Utc::now());
  let n = queue.len();
  for ticket in queue {
    store
      .import(ticket)
      .await
      .context("failed to import sample ticket")?;
  }
  Ok(n)
}
