// catalog/src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{error, info, instrument};

use super::{ProduitStore, TokenBlacklist, UserStore};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{NewProduit, NewUser, Produit, User};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";
const PRODUIT_COLUMNS: &str = "id, name, description, price, owner_id, created_at, url";

/// PostgreSQL backend. Uniqueness and the owner cascade are enforced by the
/// schema in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str, max_connections: u32) -> CatalogResult<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await?;
    info!("Successfully connected to the database.");
    Ok(Self::new(pool))
  }

  /// Applies pending schema migrations.
  pub async fn migrate(&self) -> CatalogResult<()> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    info!("Database migrations applied.");
    Ok(())
  }
}

fn map_unique_violation(err: sqlx::Error) -> CatalogError {
  if let sqlx::Error::Database(db_err) = &err {
    if db_err.is_unique_violation() {
      return match db_err.constraint() {
        Some("users_email_lower_key") => {
          CatalogError::Validation("email: A user with that email already exists.".to_string())
        }
        _ => CatalogError::Validation("username: A user with that username already exists.".to_string()),
      };
    }
  }
  error!(error = %err, "Database error while inserting user.");
  CatalogError::Storage(err)
}

#[async_trait]
impl UserStore for PgStore {
  #[instrument(name = "PgStore::insert_user", skip(self, new_user), fields(username = %new_user.username))]
  async fn insert_user(&self, new_user: NewUser) -> CatalogResult<User> {
    let query = format!(
      "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
      USER_COLUMNS
    );
    sqlx::query_as::<_, User>(&query)
      .bind(&new_user.username)
      .bind(&new_user.email)
      .bind(&new_user.password_hash)
      .fetch_one(&self.pool)
      .await
      .map_err(map_unique_violation)
  }

  async fn find_user_by_id(&self, id: i64) -> CatalogResult<Option<User>> {
    let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    Ok(sqlx::query_as::<_, User>(&query).bind(id).fetch_optional(&self.pool).await?)
  }

  async fn find_user_by_username(&self, username: &str) -> CatalogResult<Option<User>> {
    let query = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
    Ok(
      sqlx::query_as::<_, User>(&query)
        .bind(username)
        .fetch_optional(&self.pool)
        .await?,
    )
  }

  async fn find_user_by_email(&self, email: &str) -> CatalogResult<Option<User>> {
    let query = format!("SELECT {} FROM users WHERE lower(email) = lower($1)", USER_COLUMNS);
    Ok(sqlx::query_as::<_, User>(&query).bind(email).fetch_optional(&self.pool).await?)
  }

  #[instrument(name = "PgStore::delete_user", skip(self))]
  async fn delete_user(&self, id: i64) -> CatalogResult<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn count_users(&self) -> CatalogResult<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
      .fetch_one(&self.pool)
      .await?;
    Ok(count as u64)
  }
}

#[async_trait]
impl ProduitStore for PgStore {
  #[instrument(name = "PgStore::list_produits", skip(self))]
  async fn list_produits(&self, owner: Option<i64>) -> CatalogResult<Vec<Produit>> {
    let query = format!(
      "SELECT {} FROM produits WHERE ($1::BIGINT IS NULL OR owner_id = $1) ORDER BY id ASC",
      PRODUIT_COLUMNS
    );
    Ok(sqlx::query_as::<_, Produit>(&query).bind(owner).fetch_all(&self.pool).await?)
  }

  async fn find_produit(&self, id: i64) -> CatalogResult<Option<Produit>> {
    let query = format!("SELECT {} FROM produits WHERE id = $1", PRODUIT_COLUMNS);
    Ok(sqlx::query_as::<_, Produit>(&query).bind(id).fetch_optional(&self.pool).await?)
  }

  #[instrument(name = "PgStore::insert_produit", skip(self, produit))]
  async fn insert_produit(&self, owner: i64, produit: NewProduit) -> CatalogResult<Produit> {
    let query = format!(
      "INSERT INTO produits (name, description, price, owner_id, url) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
      PRODUIT_COLUMNS
    );
    sqlx::query_as::<_, Produit>(&query)
      .bind(&produit.name)
      .bind(&produit.description)
      .bind(produit.price)
      .bind(owner)
      .bind(&produit.url)
      .fetch_one(&self.pool)
      .await
      .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
          if db_err.is_foreign_key_violation() {
            return CatalogError::NotFound(format!("User with ID {} not found.", owner));
          }
        }
        CatalogError::Storage(e)
      })
  }
}

#[async_trait]
impl TokenBlacklist for PgStore {
  async fn blacklist_token(&self, jti: &str, user_id: i64, expires_at: DateTime<Utc>) -> CatalogResult<bool> {
    let result = sqlx::query(
      "INSERT INTO token_blacklist (jti, user_id, expires_at) VALUES ($1, $2, $3) ON CONFLICT (jti) DO NOTHING",
    )
    .bind(jti)
    .bind(user_id)
    .bind(expires_at)
    .execute(&self.pool)
    .await?;
    Ok(result.rows_affected() == 1)
  }

  async fn is_token_blacklisted(&self, jti: &str) -> CatalogResult<bool> {
    Ok(
      sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM token_blacklist WHERE jti = $1)")
        .bind(jti)
        .fetch_one(&self.pool)
        .await?,
    )
  }

  #[instrument(name = "PgStore::purge_expired_tokens", skip(self))]
  async fn purge_expired_tokens(&self, now: DateTime<Utc>) -> CatalogResult<u64> {
    let result = sqlx::query("DELETE FROM token_blacklist WHERE expires_at < $1")
      .bind(now)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected())
  }
}
