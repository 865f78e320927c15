// catalog/src/models/mod.rs

//! Data structures representing persisted entities and their input payloads.

pub mod produit;
pub mod user;

pub use produit::{NewProduit, Produit};
pub use user::{NewUser, RegisterUser, User};
