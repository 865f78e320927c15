// catalog/server/src/state.rs
use crate::config::{AppConfig, StorageBackend};
use crate::errors::{AppError, Result};
use catalog::{IdentityService, MemoryStore, PgStore, ProductCatalog, Store, TokenIssuer};
use chrono::Duration;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub identity: Arc<IdentityService>,
  pub catalog: Arc<ProductCatalog>,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  /// Opens the configured backend (running migrations for PostgreSQL) and
  /// wires both services to it.
  pub async fn build(config: Arc<AppConfig>) -> Result<Self> {
    let store: Arc<dyn Store> = match config.storage_backend {
      StorageBackend::Postgres => {
        let url = config
          .database_url
          .as_deref()
          .ok_or_else(|| AppError::Config("DATABASE_URL is required for the postgres backend".to_string()))?;
        let pg = PgStore::connect(url, config.database_max_connections).await?;
        pg.migrate().await?;
        Arc::new(pg)
      }
      StorageBackend::Memory => {
        tracing::warn!("Using the in-memory store; data is lost on shutdown.");
        Arc::new(MemoryStore::new())
      }
    };
    Self::with_store(config, store)
  }

  pub fn with_store(config: Arc<AppConfig>, store: Arc<dyn Store>) -> Result<Self> {
    let tokens = TokenIssuer::new(
      config.jwt_secret.as_bytes(),
      Duration::seconds(config.access_token_ttl_secs),
      Duration::seconds(config.refresh_token_ttl_secs),
    )?;
    Ok(Self {
      identity: Arc::new(IdentityService::new(store.clone(), tokens)),
      catalog: Arc::new(ProductCatalog::new(store)),
      config,
    })
  }
}
