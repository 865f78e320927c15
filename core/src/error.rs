// catalog/src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
  /// Input rejected before touching storage (bad field, duplicate username...).
  #[error("Validation error: {0}")]
  Validation(String),

  /// Credentials or access token rejected.
  #[error("Authentication failed: {0}")]
  Authentication(String),

  /// Refresh token malformed, expired, of the wrong type or blacklisted.
  #[error("Token is invalid or expired: {0}")]
  TokenInvalid(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Storage error: {0}")]
  Storage(#[from] sqlx::Error),

  #[error("Migration error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Internal error: {0}")]
  Internal(String),
}

pub type CatalogResult<T, E = CatalogError> = std::result::Result<T, E>;
