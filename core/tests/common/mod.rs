// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use catalog::{Decimal, IdentityService, MemoryStore, NewProduit, ProductCatalog, RegisterUser, Store, TokenIssuer, User};
use chrono::Duration;
use once_cell::sync::Lazy;
use std::str::FromStr;
use std::sync::Arc;
use tracing::Level;

pub const TEST_SECRET: &[u8] = b"integration-test-secret-0123456789";

/// Both services wired to one shared in-memory backend.
pub struct Harness {
  pub store: Arc<MemoryStore>,
  pub identity: IdentityService,
  pub catalog: ProductCatalog,
}

pub fn harness() -> Harness {
  let store = Arc::new(MemoryStore::new());
  let (identity, catalog) = services(store.clone());
  Harness {
    identity,
    catalog,
    store,
  }
}

/// Both services over any backend, with short test lifetimes.
pub fn services(store: Arc<dyn Store>) -> (IdentityService, ProductCatalog) {
  setup_tracing();
  let tokens = TokenIssuer::new(TEST_SECRET, Duration::minutes(5), Duration::days(1)).expect("token issuer");
  (IdentityService::new(store.clone(), tokens), ProductCatalog::new(store))
}

pub fn register_payload(username: &str) -> RegisterUser {
  RegisterUser {
    username: username.to_string(),
    email: format!("{}@example.org", username),
    password: format!("{}-password", username),
  }
}

impl Harness {
  pub async fn register(&self, username: &str) -> User {
    self
      .identity
      .register(register_payload(username))
      .await
      .expect("registration should succeed")
  }
}

pub fn produit(name: &str, price: &str) -> NewProduit {
  NewProduit {
    name: name.to_string(),
    description: Some(format!("{} description", name)),
    price: Decimal::from_str(price).expect("decimal literal"),
    url: None,
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
