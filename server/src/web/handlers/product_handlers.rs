// catalog/server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use catalog::NewProduit;

#[derive(Deserialize, Debug)]
pub struct ListProduitsQuery {
  /// Restrict the listing to one owner's produits.
  pub owner: Option<i64>,
}

#[instrument(name = "handler::list_produits", skip(app_state, _auth_user))]
pub async fn list_produits_handler(
  app_state: web::Data<AppState>,
  _auth_user: AuthenticatedUser,
  query_params: web::Query<ListProduitsQuery>,
) -> Result<HttpResponse, AppError> {
  let produits = app_state.catalog.list(query_params.owner).await?;
  Ok(HttpResponse::Ok().json(produits))
}

#[instrument(name = "handler::get_produit", skip(app_state, _auth_user, path), fields(produit_id = %path.as_ref()))]
pub async fn get_produit_handler(
  app_state: web::Data<AppState>,
  _auth_user: AuthenticatedUser,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let produit = app_state.catalog.get(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(produit))
}

#[instrument(name = "handler::create_produit", skip_all, fields(owner = %auth_user.0.id))]
pub async fn create_produit_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<NewProduit>,
) -> Result<HttpResponse, AppError> {
  let produit = app_state.catalog.create(auth_user.0.id, req_payload.into_inner()).await?;
  info!(produit_id = produit.id, "Produit created through the API.");
  Ok(HttpResponse::Created().json(produit))
}
