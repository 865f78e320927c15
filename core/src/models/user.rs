// catalog/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{CatalogError, CatalogResult};

pub const USERNAME_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 254;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
  pub id: i64,
  pub username: String,
  pub email: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub created_at: DateTime<Utc>,
}

/// Registration payload. The password is plain text until the identity
/// service hashes it; it is never serialized back out.
#[derive(Clone, Deserialize)]
pub struct RegisterUser {
  pub username: String,
  pub email: String,
  pub password: String,
}

impl std::fmt::Debug for RegisterUser {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RegisterUser")
      .field("username", &self.username)
      .field("email", &self.email)
      .finish_non_exhaustive()
  }
}

impl RegisterUser {
  /// Checks field shape only; uniqueness is the store's job.
  pub fn validate(&self) -> CatalogResult<()> {
    validate_username(&self.username)?;
    validate_email(&self.email)?;
    if self.password.is_empty() {
      return Err(CatalogError::Validation("password: This field may not be blank.".to_string()));
    }
    Ok(())
  }
}

/// Row handed to a `UserStore`; the hash is already computed.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username: String,
  pub email: String,
  pub password_hash: String,
}

/// Letters, digits and `@ . + - _`, at most 150 characters.
pub fn validate_username(username: &str) -> CatalogResult<()> {
  if username.is_empty() {
    return Err(CatalogError::Validation("username: This field may not be blank.".to_string()));
  }
  if username.chars().count() > USERNAME_MAX_LEN {
    return Err(CatalogError::Validation(format!(
      "username: Ensure this field has no more than {} characters.",
      USERNAME_MAX_LEN
    )));
  }
  let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
  if !username.chars().all(allowed) {
    return Err(CatalogError::Validation(
      "username: Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
        .to_string(),
    ));
  }
  Ok(())
}

pub fn validate_email(email: &str) -> CatalogResult<()> {
  let invalid = || CatalogError::Validation("email: Enter a valid email address.".to_string());
  if email.is_empty() {
    return Err(CatalogError::Validation("email: This field may not be blank.".to_string()));
  }
  if email.len() > EMAIL_MAX_LEN || email.chars().any(char::is_whitespace) {
    return Err(invalid());
  }
  let (local, domain) = email.rsplit_once('@').ok_or_else(invalid)?;
  if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.')
  {
    return Err(invalid());
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn payload(username: &str, email: &str, password: &str) -> RegisterUser {
    RegisterUser {
      username: username.to_string(),
      email: email.to_string(),
      password: password.to_string(),
    }
  }

  #[test]
  fn accepts_usual_registration() {
    assert!(payload("marie.curie+lab", "marie@example.org", "radium88").validate().is_ok());
  }

  #[test]
  fn rejects_usernames_with_spaces_or_symbols() {
    assert!(validate_username("marie curie").is_err());
    assert!(validate_username("marie#1").is_err());
    assert!(validate_username(&"a".repeat(USERNAME_MAX_LEN + 1)).is_err());
    assert!(validate_username(&"a".repeat(USERNAME_MAX_LEN)).is_ok());
  }

  #[test]
  fn rejects_malformed_emails() {
    for email in ["", "marie", "marie@", "@example.org", "marie@localhost", "ma rie@example.org", "m@.org"] {
      assert!(validate_email(email).is_err(), "{email:?} should be rejected");
    }
  }

  #[test]
  fn blank_password_is_rejected() {
    let err = payload("marie", "marie@example.org", "").validate().unwrap_err();
    assert!(matches!(err, CatalogError::Validation(m) if m.starts_with("password")));
  }

  #[test]
  fn debug_output_hides_password() {
    let rendered = format!("{:?}", payload("marie", "marie@example.org", "radium88"));
    assert!(!rendered.contains("radium88"));
  }

  #[test]
  fn password_hash_is_never_serialized() {
    let user = User {
      id: 1,
      username: "marie".to_string(),
      email: "marie@example.org".to_string(),
      password_hash: "$argon2id$secret".to_string(),
      created_at: Utc::now(),
    };
    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("password_hash").is_none());
    assert_eq!(json["username"], "marie");
  }
}
