// catalog/server/src/web/extractors.rs

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::cookies::ACCESS_COOKIE;
use catalog::User;

/// The user behind the request's access token.
///
/// The token is read from `Authorization: Bearer <token>`, falling back to
/// the `access_token` cookie set at login.
#[derive(Debug)]
pub struct AuthenticatedUser(pub User);

pub fn access_token_from(req: &HttpRequest) -> Option<String> {
  let from_header = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| value.strip_prefix("Bearer "))
    .map(|token| token.trim().to_string())
    .filter(|token| !token.is_empty());
  from_header.or_else(|| req.cookie(ACCESS_COOKIE).map(|c| c.value().to_string()))
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let app_state = req.app_data::<web::Data<AppState>>().cloned();
    let token = access_token_from(req);

    Box::pin(async move {
      let app_state =
        app_state.ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;
      let Some(token) = token else {
        warn!("AuthenticatedUser extractor: no access token on request.");
        return Err(AppError::Auth("Authentication credentials were not provided.".to_string()));
      };
      let user = app_state.identity.authenticate(&token).await?;
      Ok(AuthenticatedUser(user))
    })
  }
}
