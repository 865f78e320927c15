// catalog/server/src/web/cookies.rs

use actix_web::cookie::{time::Duration, Cookie, SameSite};

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

/// HttpOnly cookie carrying a token for `max_age_secs`.
pub fn token_cookie(name: &'static str, token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
  Cookie::build(name, token)
    .path("/")
    .http_only(true)
    .secure(secure)
    .same_site(SameSite::Lax)
    .max_age(Duration::seconds(max_age_secs))
    .finish()
}

/// Expired, empty cookie that makes the browser drop `name`.
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
  let mut cookie = Cookie::build(name, "").path("/").finish();
  cookie.make_removal();
  cookie
}
