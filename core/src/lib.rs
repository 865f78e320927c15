// catalog/src/lib.rs

//! Catalog: identity and Produit services behind a JWT-authenticated API.
//!
//! The crate provides:
//!  - User registration with Argon2 password hashing.
//!  - Login issuing an access/refresh JWT pair, refresh, and logout through a
//!    refresh-token blacklist.
//!  - Produit records owned by a user, removed when that user is deleted.
//!  - Storage behind async traits, with in-memory and PostgreSQL backends.

pub mod auth;
pub mod products;
pub mod error;
pub mod identity;
pub mod models;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::auth::{Claims, TokenIssuer, TokenKind, TokenPair};
pub use crate::products::ProductCatalog;
pub use crate::error::{CatalogError, CatalogResult};
pub use crate::identity::IdentityService;
pub use crate::models::{NewProduit, Produit, RegisterUser, User};
pub use crate::store::{MemoryStore, PgStore, Store};

pub use rust_decimal::Decimal;
