// catalog/src/products.rs

//! Owner-scoped Produit listing, lookup and creation.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::models::{NewProduit, Produit};
use crate::store::Store;

#[derive(Clone)]
pub struct ProductCatalog {
  store: Arc<dyn Store>,
}

impl std::fmt::Debug for ProductCatalog {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ProductCatalog").finish_non_exhaustive()
  }
}

impl ProductCatalog {
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self { store }
  }

  #[instrument(name = "ProductCatalog::list", skip(self))]
  pub async fn list(&self, owner: Option<i64>) -> CatalogResult<Vec<Produit>> {
    let produits = self.store.list_produits(owner).await?;
    info!("Fetched {} produits.", produits.len());
    Ok(produits)
  }

  #[instrument(name = "ProductCatalog::get", skip(self))]
  pub async fn get(&self, id: i64) -> CatalogResult<Produit> {
    self.store.find_produit(id).await?.ok_or_else(|| {
      warn!("Produit with ID {} not found.", id);
      CatalogError::NotFound(format!("Produit with ID {} not found.", id))
    })
  }

  #[instrument(name = "ProductCatalog::create", skip(self, payload), fields(name = %payload.name), err(Display))]
  pub async fn create(&self, owner: i64, payload: NewProduit) -> CatalogResult<Produit> {
    let produit = self.store.insert_produit(owner, payload.validate()?).await?;
    info!(produit_id = produit.id, "Produit created.");
    Ok(produit)
  }
}
