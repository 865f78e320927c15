// catalog/src/identity.rs

//! User registration and JWT session lifecycle.
//!
//! A refresh token moves through `valid -> (refreshed)* -> blacklisted`.
//! Refreshing mints a new access token and leaves the refresh token valid.
//! Access tokens are never blacklisted; they lapse on expiry.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::auth::password;
use crate::auth::{Claims, TokenIssuer, TokenKind, TokenPair};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{NewUser, RegisterUser, User};
use crate::store::Store;

const BAD_CREDENTIALS: &str = "No active account found with the given credentials";

#[derive(Clone)]
pub struct IdentityService {
  store: Arc<dyn Store>,
  tokens: TokenIssuer,
}

impl std::fmt::Debug for IdentityService {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("IdentityService").field("tokens", &self.tokens).finish_non_exhaustive()
  }
}

impl IdentityService {
  pub fn new(store: Arc<dyn Store>, tokens: TokenIssuer) -> Self {
    Self { store, tokens }
  }

  pub fn tokens(&self) -> &TokenIssuer {
    &self.tokens
  }

  #[instrument(name = "IdentityService::register", skip(self, payload), fields(username = %payload.username), err(Display))]
  pub async fn register(&self, payload: RegisterUser) -> CatalogResult<User> {
    payload.validate()?;

    // Friendly early rejection; the store re-checks atomically on insert.
    if self.store.find_user_by_username(&payload.username).await?.is_some() {
      warn!("Attempt to register with existing username.");
      return Err(CatalogError::Validation(
        "username: A user with that username already exists.".to_string(),
      ));
    }
    if self.store.find_user_by_email(&payload.email).await?.is_some() {
      warn!("Attempt to register with existing email.");
      return Err(CatalogError::Validation("email: A user with that email already exists.".to_string()));
    }

    let password_hash = password::hash_password(&payload.password)?;
    let user = self
      .store
      .insert_user(NewUser {
        username: payload.username,
        email: payload.email,
        password_hash,
      })
      .await?;
    info!(user_id = user.id, "User registered.");
    Ok(user)
  }

  /// `identifier` is matched against usernames first, then emails.
  #[instrument(name = "IdentityService::login", skip(self, password), err(Display))]
  pub async fn login(&self, identifier: &str, password: &str) -> CatalogResult<TokenPair> {
    if identifier.is_empty() || password.is_empty() {
      return Err(CatalogError::Authentication(BAD_CREDENTIALS.to_string()));
    }

    let user = match self.store.find_user_by_username(identifier).await? {
      Some(user) => Some(user),
      None => self.store.find_user_by_email(identifier).await?,
    };
    let Some(user) = user else {
      warn!("Login attempt for unknown account.");
      return Err(CatalogError::Authentication(BAD_CREDENTIALS.to_string()));
    };

    if !password::verify_password(&user.password_hash, password)? {
      warn!(user_id = user.id, "Password mismatch on login.");
      return Err(CatalogError::Authentication(BAD_CREDENTIALS.to_string()));
    }

    let (access, _) = self.tokens.issue(user.id, TokenKind::Access)?;
    let (refresh, _) = self.tokens.issue(user.id, TokenKind::Refresh)?;
    info!(user_id = user.id, "Login successful.");
    Ok(TokenPair { access, refresh })
  }

  /// Mints a new access token from a still-valid refresh token.
  #[instrument(name = "IdentityService::refresh", skip_all, err(Display))]
  pub async fn refresh(&self, refresh_token: &str) -> CatalogResult<String> {
    let claims = self.valid_refresh_claims(refresh_token).await?;
    let (access, _) = self.tokens.issue(claims.sub, TokenKind::Access)?;
    info!(user_id = claims.sub, "Access token refreshed.");
    Ok(access)
  }

  /// Blacklists the refresh token until it would have expired anyway.
  #[instrument(name = "IdentityService::logout", skip_all, err(Display))]
  pub async fn logout(&self, refresh_token: &str) -> CatalogResult<()> {
    let claims = self.valid_refresh_claims(refresh_token).await?;
    let inserted = self
      .store
      .blacklist_token(&claims.jti, claims.sub, claims.expires_at())
      .await?;
    if !inserted {
      // Lost a race with a concurrent logout of the same token.
      return Err(CatalogError::TokenInvalid("Token is blacklisted".to_string()));
    }
    info!(user_id = claims.sub, "Refresh token blacklisted.");
    Ok(())
  }

  /// Resolves an access token to its user.
  #[instrument(name = "IdentityService::authenticate", skip_all, err(Display))]
  pub async fn authenticate(&self, access_token: &str) -> CatalogResult<User> {
    if access_token.is_empty() {
      return Err(CatalogError::Authentication(
        "Authentication credentials were not provided.".to_string(),
      ));
    }
    let claims = self
      .tokens
      .decode(access_token, TokenKind::Access)
      .map_err(|rejection| CatalogError::Authentication(rejection.to_string()))?;
    self
      .store
      .find_user_by_id(claims.sub)
      .await?
      .ok_or_else(|| CatalogError::Authentication("User not found".to_string()))
  }

  /// Removes the account and, by cascade, every Produit it owns.
  #[instrument(name = "IdentityService::delete_user", skip(self), err(Display))]
  pub async fn delete_user(&self, user_id: i64) -> CatalogResult<()> {
    if !self.store.delete_user(user_id).await? {
      return Err(CatalogError::NotFound(format!("User with ID {} not found.", user_id)));
    }
    info!(user_id, "User deleted.");
    Ok(())
  }

  /// Drops blacklist entries for tokens that have expired on their own.
  #[instrument(name = "IdentityService::purge_expired_blacklist", skip(self), err(Display))]
  pub async fn purge_expired_blacklist(&self) -> CatalogResult<u64> {
    let purged = self.store.purge_expired_tokens(Utc::now()).await?;
    info!(purged, "Expired blacklist entries purged.");
    Ok(purged)
  }

  async fn valid_refresh_claims(&self, refresh_token: &str) -> CatalogResult<Claims> {
    let claims = self
      .tokens
      .decode(refresh_token, TokenKind::Refresh)
      .map_err(|rejection| CatalogError::TokenInvalid(rejection.to_string()))?;
    if self.store.is_token_blacklisted(&claims.jti).await? {
      return Err(CatalogError::TokenInvalid("Token is blacklisted".to_string()));
    }
    // A deleted user's tokens are dead; the blacklist row would have no owner.
    if self.store.find_user_by_id(claims.sub).await?.is_none() {
      return Err(CatalogError::TokenInvalid("User not found".to_string()));
    }
    Ok(claims)
  }
}
