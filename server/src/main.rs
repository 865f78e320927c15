// catalog/server/src/main.rs

mod config;
mod errors;
mod state;
mod web;

use crate::config::AppConfig;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

const DEFAULT_LOG_FILTER: &str = "info";

/// `RUST_LOG` when set, `info` otherwise.
fn default_env_filter() -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// `RUST_LOG` overrides the level; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
  let builder = tracing_subscriber::fmt()
    .with_env_filter(default_env_filter())
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration
  let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
  if json {
    builder.json().init();
  } else {
    builder.init();
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  init_tracing();

  tracing::info!("Starting catalog server...");

  let app_config = Arc::new(AppConfig::from_env().context("Failed to load application configuration")?);
  tracing::debug!(config = ?app_config, "Loaded config details");

  let app_state = AppState::build(app_config.clone())
    .await
    .context("Failed to initialize application state")?;

  if let Err(e) = app_state.identity.purge_expired_blacklist().await {
    // Stale entries only cost storage; keep serving.
    tracing::warn!(error = %e, "Failed to purge expired blacklist entries.");
  }

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await?;

  Ok(())
}
