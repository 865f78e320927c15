// tests/postgres_tests.rs
//! Runs against a live PostgreSQL server. Each test gets a fresh database
//! with `migrations/` applied:
//!
//! DATABASE_URL=postgres://... cargo test -p catalog --test postgres_tests -- --ignored
mod common;

use catalog::models::NewUser;
use catalog::store::{ProduitStore, TokenBlacklist, UserStore};
use catalog::{CatalogError, PgStore, TokenKind};
use chrono::{Duration, Utc};
use common::*;
use sqlx::PgPool;
use std::sync::Arc;

fn new_user(username: &str, email: &str) -> NewUser {
  NewUser {
    username: username.to_string(),
    email: email.to_string(),
    password_hash: "$argon2id$stub".to_string(),
  }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_pg_duplicate_username_creates_no_second_user(pool: PgPool) {
  let (identity, _) = services(Arc::new(PgStore::new(pool.clone())));
  let store = PgStore::new(pool);

  identity.register(register_payload("alice")).await.unwrap();
  let mut again = register_payload("alice");
  again.email = "other@example.org".to_string();
  assert!(matches!(identity.register(again).await, Err(CatalogError::Validation(_))));

  // The constraint itself, without the service's early check.
  let err = store.insert_user(new_user("alice", "third@example.org")).await.unwrap_err();
  assert!(matches!(err, CatalogError::Validation(ref m) if m.starts_with("username")));
  assert_eq!(store.count_users().await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_pg_email_unique_index_ignores_case(pool: PgPool) {
  let store = PgStore::new(pool);
  store.insert_user(new_user("a", "Alice@Example.org")).await.unwrap();

  let err = store.insert_user(new_user("b", "alice@EXAMPLE.ORG")).await.unwrap_err();
  assert!(matches!(err, CatalogError::Validation(ref m) if m.starts_with("email")));
  assert!(store.find_user_by_email("ALICE@example.org").await.unwrap().is_some());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_pg_produit_needs_existing_owner(pool: PgPool) {
  let store = PgStore::new(pool);
  let err = store.insert_produit(99, produit("Lampe", "10.50")).await.unwrap_err();
  assert!(matches!(err, CatalogError::NotFound(_)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_pg_list_orders_by_id_and_filters_by_owner(pool: PgPool) {
  let (identity, catalog) = services(Arc::new(PgStore::new(pool)));
  let alice = identity.register(register_payload("alice")).await.unwrap();
  let bob = identity.register(register_payload("bob")).await.unwrap();

  let lampe = catalog.create(alice.id, produit("Lampe", "12.5")).await.unwrap();
  let table = catalog.create(bob.id, produit("Table", "80")).await.unwrap();
  let chaise = catalog.create(alice.id, produit("Chaise", "35.00")).await.unwrap();

  assert_eq!(lampe.price.to_string(), "12.50");
  assert_eq!(catalog.list(None).await.unwrap(), vec![lampe.clone(), table.clone(), chaise.clone()]);
  assert_eq!(catalog.list(Some(alice.id)).await.unwrap(), vec![lampe, chaise]);
  assert_eq!(catalog.list(Some(bob.id)).await.unwrap(), vec![table.clone()]);
  assert_eq!(catalog.get(table.id).await.unwrap(), table);
  assert!(matches!(catalog.get(table.id + 100).await, Err(CatalogError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_pg_blacklist_is_idempotent_and_purgeable(pool: PgPool) {
  let store = PgStore::new(pool);
  let owner = store.insert_user(new_user("a", "a@example.org")).await.unwrap();
  let now = Utc::now();

  assert!(store.blacklist_token("old", owner.id, now - Duration::hours(1)).await.unwrap());
  assert!(store.blacklist_token("fresh", owner.id, now + Duration::hours(1)).await.unwrap());
  assert!(!store.blacklist_token("fresh", owner.id, now + Duration::hours(1)).await.unwrap());

  assert_eq!(store.purge_expired_tokens(now).await.unwrap(), 1);
  assert!(!store.is_token_blacklisted("old").await.unwrap());
  assert!(store.is_token_blacklisted("fresh").await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_pg_session_lifecycle(pool: PgPool) {
  let (identity, _) = services(Arc::new(PgStore::new(pool)));
  identity.register(register_payload("alice")).await.unwrap();

  let pair = identity.login("alice@example.org", "alice-password").await.unwrap();
  assert_ne!(pair.access, pair.refresh);
  assert!(identity.refresh(&pair.refresh).await.is_ok());

  identity.logout(&pair.refresh).await.unwrap();
  assert!(matches!(identity.refresh(&pair.refresh).await, Err(CatalogError::TokenInvalid(_))));
  assert!(matches!(identity.logout(&pair.refresh).await, Err(CatalogError::TokenInvalid(_))));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_pg_account_deletion_cascades(pool: PgPool) {
  let store = Arc::new(PgStore::new(pool));
  let (identity, catalog) = services(store.clone());
  let alice = identity.register(register_payload("alice")).await.unwrap();
  let bob = identity.register(register_payload("bob")).await.unwrap();
  catalog.create(alice.id, produit("Lampe", "1")).await.unwrap();
  let kept = catalog.create(bob.id, produit("Table", "2")).await.unwrap();

  let pair = identity.login("alice", "alice-password").await.unwrap();
  let claims = identity.tokens().decode(&pair.refresh, TokenKind::Refresh).unwrap();
  identity.delete_user(alice.id).await.unwrap();

  assert_eq!(catalog.list(None).await.unwrap(), vec![kept]);
  // Token of a deleted user: rejected as invalid, not a storage failure.
  assert!(matches!(identity.logout(&pair.refresh).await, Err(CatalogError::TokenInvalid(_))));
  assert!(!store.is_token_blacklisted(&claims.jti).await.unwrap());
}
