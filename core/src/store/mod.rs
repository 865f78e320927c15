// catalog/src/store/mod.rs

//! Storage seams for users, produits and the refresh-token blacklist.
//!
//! Two backends implement every trait: [`MemoryStore`] (tests, local runs) and
//! [`PgStore`] (PostgreSQL through `sqlx`). Services hold an `Arc<dyn Store>`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CatalogResult;
use crate::models::{NewProduit, NewUser, Produit, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
  /// Inserts a user. A taken username or email is a `Validation` error and
  /// leaves the store unchanged.
  async fn insert_user(&self, new_user: NewUser) -> CatalogResult<User>;

  async fn find_user_by_id(&self, id: i64) -> CatalogResult<Option<User>>;

  async fn find_user_by_username(&self, username: &str) -> CatalogResult<Option<User>>;

  async fn find_user_by_email(&self, email: &str) -> CatalogResult<Option<User>>;

  /// Deletes the user and every Produit they own. Returns `false` if the user
  /// did not exist.
  async fn delete_user(&self, id: i64) -> CatalogResult<bool>;

  async fn count_users(&self) -> CatalogResult<u64>;
}

#[async_trait]
pub trait ProduitStore: Send + Sync {
  /// All produits ordered by id, restricted to `owner` when given.
  async fn list_produits(&self, owner: Option<i64>) -> CatalogResult<Vec<Produit>>;

  async fn find_produit(&self, id: i64) -> CatalogResult<Option<Produit>>;

  /// Inserts an already validated produit; `created_at` is stamped here.
  async fn insert_produit(&self, owner: i64, produit: NewProduit) -> CatalogResult<Produit>;
}

#[async_trait]
pub trait TokenBlacklist: Send + Sync {
  /// Records `jti` as revoked. Returns `false` if it was already present.
  async fn blacklist_token(&self, jti: &str, user_id: i64, expires_at: DateTime<Utc>) -> CatalogResult<bool>;

  async fn is_token_blacklisted(&self, jti: &str) -> CatalogResult<bool>;

  /// Drops entries whose token expired before `now`; returns how many.
  async fn purge_expired_tokens(&self, now: DateTime<Utc>) -> CatalogResult<u64>;
}

/// Everything the services need from a backend.
pub trait Store: UserStore + ProduitStore + TokenBlacklist {}

impl<T: UserStore + ProduitStore + TokenBlacklist> Store for T {}
