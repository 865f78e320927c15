// catalog/server/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use catalog::CatalogError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Catalog Error: {source}")]
  Catalog {
    #[from] // Allows conversion from catalog::CatalogError
    source: CatalogError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
      AppError::Catalog { source } => match source {
        CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
        CatalogError::Authentication(_) | CatalogError::TokenInvalid(_) => StatusCode::UNAUTHORIZED,
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::Storage(_) | CatalogError::Migration(_) | CatalogError::Internal(_) => {
          StatusCode::INTERNAL_SERVER_ERROR
        }
      },
    }
  }

  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    let message = match self {
      AppError::Validation(m) | AppError::Auth(m) | AppError::NotFound(m) => m.clone(),
      AppError::Catalog { source } => match source {
        CatalogError::Validation(m)
        | CatalogError::Authentication(m)
        | CatalogError::TokenInvalid(m)
        | CatalogError::NotFound(m) => m.clone(),
        CatalogError::Storage(_) | CatalogError::Migration(_) => "Database operation failed".to_string(),
        CatalogError::Internal(_) => "An internal error occurred".to_string(),
      },
      AppError::Config(_) => "Configuration issue".to_string(),
      AppError::Internal(_) => "An internal error occurred".to_string(),
    };
    HttpResponse::build(self.status_code()).json(json!({ "error": message }))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
