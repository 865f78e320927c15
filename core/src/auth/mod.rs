// catalog/src/auth/mod.rs

pub mod password;
pub mod tokens;

pub use tokens::{Claims, TokenIssuer, TokenKind, TokenPair, TokenRejection};
