// catalog/server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::cookies::{removal_cookie, token_cookie, ACCESS_COOKIE, REFRESH_COOKIE};
use crate::web::extractors::AuthenticatedUser;
use catalog::RegisterUser;

// --- Request DTOs ---
#[derive(Deserialize)]
pub struct LoginRequestPayload {
  /// Username or email address.
  pub username: String,
  pub password: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct RefreshRequestPayload {
  pub refresh: Option<String>,
}

/// Body field first, then the `refresh_token` cookie.
fn refresh_token_from(req: &HttpRequest, body: Option<web::Json<RefreshRequestPayload>>) -> Result<String, AppError> {
  body
    .and_then(|b| b.into_inner().refresh)
    .filter(|t| !t.is_empty())
    .or_else(|| req.cookie(REFRESH_COOKIE).map(|c| c.value().to_string()))
    .ok_or_else(|| AppError::Validation("refresh: This field is required.".to_string()))
}

// --- Handler Implementations ---

#[instrument(name = "handler::register", skip(app_state, req_payload), fields(username = %req_payload.username))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RegisterUser>,
) -> Result<HttpResponse, AppError> {
  let user = app_state.identity.register(req_payload.into_inner()).await?;
  info!(user_id = user.id, "Registration successful.");
  Ok(HttpResponse::Created().json(json!({
      "username": user.username,
      "email": user.email,
  })))
}

#[instrument(name = "handler::login", skip(app_state, req_payload), fields(identifier = %req_payload.username))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LoginRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let pair = app_state
    .identity
    .login(&req_payload.username, &req_payload.password)
    .await?;

  let config = &app_state.config;
  Ok(
    HttpResponse::Ok()
      .cookie(token_cookie(
        ACCESS_COOKIE,
        pair.access.clone(),
        config.access_token_ttl_secs,
        config.cookie_secure,
      ))
      .cookie(token_cookie(
        REFRESH_COOKIE,
        pair.refresh.clone(),
        config.refresh_token_ttl_secs,
        config.cookie_secure,
      ))
      .json(pair),
  )
}

#[instrument(name = "handler::refresh", skip_all)]
pub async fn refresh_handler(
  req: HttpRequest,
  app_state: web::Data<AppState>,
  body: Option<web::Json<RefreshRequestPayload>>,
) -> Result<HttpResponse, AppError> {
  let refresh_token = refresh_token_from(&req, body)?;
  let access = app_state.identity.refresh(&refresh_token).await?;

  let config = &app_state.config;
  Ok(
    HttpResponse::Ok()
      .cookie(token_cookie(
        ACCESS_COOKIE,
        access.clone(),
        config.access_token_ttl_secs,
        config.cookie_secure,
      ))
      .json(json!({ "access": access })),
  )
}

#[instrument(name = "handler::logout", skip_all)]
pub async fn logout_handler(
  req: HttpRequest,
  app_state: web::Data<AppState>,
  body: Option<web::Json<RefreshRequestPayload>>,
) -> Result<HttpResponse, AppError> {
  let refresh_token = refresh_token_from(&req, body)?;
  app_state.identity.logout(&refresh_token).await?;

  Ok(
    HttpResponse::Ok()
      .cookie(removal_cookie(ACCESS_COOKIE))
      .cookie(removal_cookie(REFRESH_COOKIE))
      .json(json!({ "message": "Logout successful." })),
  )
}

#[instrument(name = "handler::is_logged_in", skip_all, fields(user_id = %auth_user.0.id))]
pub async fn is_logged_in_handler(auth_user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
  let AuthenticatedUser(user) = auth_user;
  Ok(HttpResponse::Ok().json(json!({
      "authenticated": true,
      "username": user.username,
  })))
}

#[instrument(name = "handler::delete_account", skip_all, fields(user_id = %auth_user.0.id))]
pub async fn delete_account_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  app_state.identity.delete_user(auth_user.0.id).await?;
  Ok(
    HttpResponse::NoContent()
      .cookie(removal_cookie(ACCESS_COOKIE))
      .cookie(removal_cookie(REFRESH_COOKIE))
      .finish(),
  )
}
