// catalog/src/auth/tokens.rs

//! HS256 JWT issuance and decoding for access and refresh tokens.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};

pub const DEFAULT_ACCESS_TTL_SECS: i64 = 5 * 60;
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
  Access,
  Refresh,
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TokenKind::Access => f.write_str("access"),
      TokenKind::Refresh => f.write_str("refresh"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  /// User id.
  pub sub: i64,
  pub exp: i64,
  pub iat: i64,
  /// Unique token id, the blacklist key.
  pub jti: String,
  pub token_type: TokenKind,
}

impl Claims {
  pub fn expires_at(&self) -> DateTime<Utc> {
    Utc.timestamp_opt(self.exp, 0).single().unwrap_or_else(Utc::now)
  }
}

/// Access and refresh tokens returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
  pub access: String,
  pub refresh: String,
}

/// Why a token was rejected. Callers map this onto `Authentication` or
/// `TokenInvalid` depending on the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenRejection {
  Expired,
  WrongType { expected: TokenKind, found: TokenKind },
  Malformed(String),
}

impl fmt::Display for TokenRejection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TokenRejection::Expired => f.write_str("Token is expired"),
      TokenRejection::WrongType { expected, found } => {
        write!(f, "Token has wrong type (expected {}, found {})", expected, found)
      }
      TokenRejection::Malformed(reason) => write!(f, "Token is malformed: {}", reason),
    }
  }
}

#[derive(Clone)]
pub struct TokenIssuer {
  encoding: EncodingKey,
  decoding: DecodingKey,
  access_ttl: Duration,
  refresh_ttl: Duration,
}

impl fmt::Debug for TokenIssuer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TokenIssuer")
      .field("access_ttl", &self.access_ttl)
      .field("refresh_ttl", &self.refresh_ttl)
      .finish_non_exhaustive()
  }
}

impl TokenIssuer {
  pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> CatalogResult<Self> {
    if secret.is_empty() {
      return Err(CatalogError::Internal("JWT signing secret cannot be empty.".to_string()));
    }
    if access_ttl <= Duration::zero() || refresh_ttl <= Duration::zero() {
      return Err(CatalogError::Internal("Token lifetimes must be positive.".to_string()));
    }
    Ok(Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      access_ttl,
      refresh_ttl,
    })
  }

  /// Signs a fresh token of the given kind for `user_id`.
  #[instrument(name = "TokenIssuer::issue", skip(self), err(Display))]
  pub fn issue(&self, user_id: i64, kind: TokenKind) -> CatalogResult<(String, Claims)> {
    let now = Utc::now();
    let ttl = match kind {
      TokenKind::Access => self.access_ttl,
      TokenKind::Refresh => self.refresh_ttl,
    };
    let claims = Claims {
      sub: user_id,
      exp: (now + ttl).timestamp(),
      iat: now.timestamp(),
      jti: Uuid::new_v4().simple().to_string(),
      token_type: kind,
    };
    let token = self.sign(&claims)?;
    debug!(jti = %claims.jti, "Token issued.");
    Ok((token, claims))
  }

  pub(crate) fn sign(&self, claims: &Claims) -> CatalogResult<String> {
    encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
      .map_err(|e| CatalogError::Internal(format!("Token signing failed: {}", e)))
  }

  /// Verifies signature, expiry and type. Blacklist checks are the identity
  /// service's concern.
  pub fn decode(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenRejection> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    let claims = decode::<Claims>(token, &self.decoding, &validation)
      .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenRejection::Expired,
        _ => TokenRejection::Malformed(e.to_string()),
      })?
      .claims;
    if claims.token_type != expected {
      return Err(TokenRejection::WrongType {
        expected,
        found: claims.token_type,
      });
    }
    Ok(claims)
  }
}
