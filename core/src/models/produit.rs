// catalog/src/models/produit.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::Url;

use crate::error::{CatalogError, CatalogResult};

pub const NAME_MAX_LEN: usize = 200;
pub const URL_MAX_LEN: usize = 200;
pub const PRICE_MAX_DIGITS: u32 = 10;
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// A priced catalog item owned by exactly one user.
///
/// Serializes as `{id, name, description, price, owner, created_at, url}`;
/// `price` is a string with two fractional digits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Produit {
  pub id: i64,
  pub name: String,
  pub description: Option<String>,
  pub price: Decimal,
  #[sqlx(rename = "owner_id")]
  pub owner: i64,
  pub created_at: DateTime<Utc>,
  pub url: Option<String>,
}

/// Client payload for creating a Produit. `id`, `owner` and `created_at`
/// are assigned server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduit {
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  pub price: Decimal,
  #[serde(default)]
  pub url: Option<String>,
}

impl NewProduit {
  /// Validates and normalizes the payload: trims the name, rescales the price
  /// to two decimal places and maps an empty url to `None`.
  pub fn validate(self) -> CatalogResult<NewProduit> {
    let name = self.name.trim().to_string();
    if name.is_empty() {
      return Err(CatalogError::Validation("name: This field may not be blank.".to_string()));
    }
    if name.chars().count() > NAME_MAX_LEN {
      return Err(CatalogError::Validation(format!(
        "name: Ensure this field has no more than {} characters.",
        NAME_MAX_LEN
      )));
    }

    let price = validate_price(self.price)?;

    let url = match self.url.map(|u| u.trim().to_string()) {
      Some(u) if u.is_empty() => None,
      Some(u) => Some(validate_url(u)?),
      None => None,
    };

    Ok(NewProduit {
      name,
      description: self.description,
      price,
      url,
    })
  }
}

/// At most 10 digits in total, 2 of them after the decimal point.
/// Sign is not checked.
pub fn validate_price(price: Decimal) -> CatalogResult<Decimal> {
  if price.normalize().scale() > PRICE_DECIMAL_PLACES {
    return Err(CatalogError::Validation(format!(
      "price: Ensure that there are no more than {} decimal places.",
      PRICE_DECIMAL_PLACES
    )));
  }
  let integer_digits = PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES;
  if price.abs() >= Decimal::from(10_i64.pow(integer_digits)) {
    return Err(CatalogError::Validation(format!(
      "price: Ensure that there are no more than {} digits in total.",
      PRICE_MAX_DIGITS
    )));
  }
  let mut price = price;
  price.rescale(PRICE_DECIMAL_PLACES);
  Ok(price)
}

pub fn validate_url(raw: String) -> CatalogResult<String> {
  let invalid = || CatalogError::Validation("url: Enter a valid URL.".to_string());
  if raw.chars().count() > URL_MAX_LEN {
    return Err(CatalogError::Validation(format!(
      "url: Ensure this field has no more than {} characters.",
      URL_MAX_LEN
    )));
  }
  let parsed = Url::parse(&raw).map_err(|_| invalid())?;
  if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
    return Err(invalid());
  }
  Ok(raw)
}
