// catalog/src/store/memory.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use super::{ProduitStore, TokenBlacklist, UserStore};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{NewProduit, NewUser, Produit, User};

#[derive(Debug, Default)]
struct Tables {
  users: BTreeMap<i64, User>,
  produits: BTreeMap<i64, Produit>,
  blacklist: HashMap<String, (i64, DateTime<Utc>)>,
  next_user_id: i64,
  next_produit_id: i64,
}

/// Process-local backend. One lock guards all tables so that uniqueness
/// checks and cascades are atomic. Guards are never held across `.await`.
#[derive(Debug, Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl UserStore for MemoryStore {
  async fn insert_user(&self, new_user: NewUser) -> CatalogResult<User> {
    let mut tables = self.tables.write();
    if tables.users.values().any(|u| u.username == new_user.username) {
      return Err(CatalogError::Validation(
        "username: A user with that username already exists.".to_string(),
      ));
    }
    let email_key = new_user.email.to_lowercase();
    if tables.users.values().any(|u| u.email.to_lowercase() == email_key) {
      return Err(CatalogError::Validation("email: A user with that email already exists.".to_string()));
    }
    tables.next_user_id += 1;
    let user = User {
      id: tables.next_user_id,
      username: new_user.username,
      email: new_user.email,
      password_hash: new_user.password_hash,
      created_at: Utc::now(),
    };
    tables.users.insert(user.id, user.clone());
    Ok(user)
  }

  async fn find_user_by_id(&self, id: i64) -> CatalogResult<Option<User>> {
    Ok(self.tables.read().users.get(&id).cloned())
  }

  async fn find_user_by_username(&self, username: &str) -> CatalogResult<Option<User>> {
    Ok(self.tables.read().users.values().find(|u| u.username == username).cloned())
  }

  async fn find_user_by_email(&self, email: &str) -> CatalogResult<Option<User>> {
    let email_key = email.to_lowercase();
    Ok(
      self
        .tables
        .read()
        .users
        .values()
        .find(|u| u.email.to_lowercase() == email_key)
        .cloned(),
    )
  }

  async fn delete_user(&self, id: i64) -> CatalogResult<bool> {
    let mut tables = self.tables.write();
    if tables.users.remove(&id).is_none() {
      return Ok(false);
    }
    let before = tables.produits.len();
    tables.produits.retain(|_, p| p.owner != id);
    tables.blacklist.retain(|_, (user_id, _)| *user_id != id);
    debug!(user_id = id, cascaded = before - tables.produits.len(), "User deleted.");
    Ok(true)
  }

  async fn count_users(&self) -> CatalogResult<u64> {
    Ok(self.tables.read().users.len() as u64)
  }
}

#[async_trait]
impl ProduitStore for MemoryStore {
  async fn list_produits(&self, owner: Option<i64>) -> CatalogResult<Vec<Produit>> {
    let tables = self.tables.read();
    Ok(
      tables
        .produits
        .values()
        .filter(|p| owner.map_or(true, |o| p.owner == o))
        .cloned()
        .collect(),
    )
  }

  async fn find_produit(&self, id: i64) -> CatalogResult<Option<Produit>> {
    Ok(self.tables.read().produits.get(&id).cloned())
  }

  async fn insert_produit(&self, owner: i64, produit: NewProduit) -> CatalogResult<Produit> {
    let mut tables = self.tables.write();
    if !tables.users.contains_key(&owner) {
      return Err(CatalogError::NotFound(format!("User with ID {} not found.", owner)));
    }
    tables.next_produit_id += 1;
    let produit = Produit {
      id: tables.next_produit_id,
      name: produit.name,
      description: produit.description,
      price: produit.price,
      owner,
      created_at: Utc::now(),
      url: produit.url,
    };
    tables.produits.insert(produit.id, produit.clone());
    Ok(produit)
  }
}

#[async_trait]
impl TokenBlacklist for MemoryStore {
  async fn blacklist_token(&self, jti: &str, user_id: i64, expires_at: DateTime<Utc>) -> CatalogResult<bool> {
    let mut tables = self.tables.write();
    if tables.blacklist.contains_key(jti) {
      return Ok(false);
    }
    tables.blacklist.insert(jti.to_string(), (user_id, expires_at));
    Ok(true)
  }

  async fn is_token_blacklisted(&self, jti: &str) -> CatalogResult<bool> {
    Ok(self.tables.read().blacklist.contains_key(jti))
  }

  async fn purge_expired_tokens(&self, now: DateTime<Utc>) -> CatalogResult<u64> {
    let mut tables = self.tables.write();
    let before = tables.blacklist.len();
    tables.blacklist.retain(|_, (_, expires_at)| *expires_at >= now);
    Ok((before - tables.blacklist.len()) as u64)
  }
}
