// catalog/server/src/web/routes.rs

use actix_web::{error, web, HttpRequest, HttpResponse};

use crate::errors::AppError;
use crate::web::handlers::{auth_handlers, product_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
  AppError::Validation(format!("Invalid request body: {}", err)).into()
}

fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> error::Error {
  AppError::Validation(format!("Invalid query string: {}", err)).into()
}

// Non-numeric ids simply do not match any produit.
fn path_error_handler(_err: error::PathError, _req: &HttpRequest) -> error::Error {
  AppError::NotFound("Not found.".to_string()).into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
    .app_data(web::PathConfig::default().error_handler(path_error_handler))
    .route("/health/", web::get().to(health_check_handler))
    // Identity
    .route("/register/", web::post().to(auth_handlers::register_handler))
    .route("/login/", web::post().to(auth_handlers::login_handler))
    .route("/token/refresh/", web::post().to(auth_handlers::refresh_handler))
    .route("/logout/", web::post().to(auth_handlers::logout_handler))
    .route("/authenticated/", web::get().to(auth_handlers::is_logged_in_handler))
    .route("/account/", web::delete().to(auth_handlers::delete_account_handler))
    // Produits
    .service(
      web::resource("/produits/")
        .route(web::get().to(product_handlers::list_produits_handler))
        .route(web::post().to(product_handlers::create_produit_handler)),
    )
    .route("/produits/{produit_id}/", web::get().to(product_handlers::get_produit_handler));
}
