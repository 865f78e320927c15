// catalog/server/src/web/handlers/mod.rs

// Declare handler modules
pub mod auth_handlers;
pub mod product_handlers;
