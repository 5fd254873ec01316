//! techflow server binary.
//!
//! Reads `techflow.toml` (or the path given with `--config`) and `TECHFLOW_*`
//! environment variables, opens the SQLite ticket store, and serves the
//! support API over HTTP.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use techflow_server::{ServerConfig, app, build_state, expand_tilde, seed_if_empty};
use techflow_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "TechFlow support server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "techflow.toml")]
  config: PathBuf,

  /// Load the sample ticket queue if the store is empty.
  #[arg(long)]
  seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = ServerConfig::load(&cli.config)?;

  let store_path = expand_tilde(&cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if cli.seed || cfg.seed_sample_data {
    let n = seed_if_empty(&store).await?;
    tracing::info!(imported = n, "sample queue seeded");
  }

  tracing::info!(
    ai_support = cfg.ai_support_enabled,
    ai_faq = cfg.ai_faq_enabled,
    "feature flags resolved"
  );

  let state = build_state(&cfg, store)?;
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app(state)).await.context("server error")?;

  Ok(())
}
