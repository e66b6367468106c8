//! Cookie builders for the session token and the cart id.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::token::SESSION_TTL_SECS;

/// Cookie holding the session JWT.
pub const VITRINE_SESSION: &str = "vitrine_session";

/// Cookie holding the anonymous cart id.
pub const VITRINE_CART: &str = "vitrine_cart";

/// Cart cookie Max-Age in seconds (30 days).
pub const CART_TTL_SECS: u64 = 2_592_000;

fn base_cookie(name: &'static str, value: String, domain: String, max_age: Duration) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .domain(domain)
        .max_age(max_age)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Set the session cookie.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use vitrine_auth_types::cookie::{set_session_cookie, VITRINE_SESSION};
///
/// let jar = set_session_cookie(CookieJar::new(), "jwt".to_string(), "shop.example".to_string());
/// let cookie = jar.get(VITRINE_SESSION).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604800)));
/// assert!(cookie.http_only().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, token: String, domain: String) -> CookieJar {
    jar.add(base_cookie(
        VITRINE_SESSION,
        token,
        domain,
        Duration::seconds(SESSION_TTL_SECS as i64),
    ))
}

/// Expire the session cookie.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use vitrine_auth_types::cookie::{clear_session_cookie, set_session_cookie, VITRINE_SESSION};
///
/// let jar = set_session_cookie(CookieJar::new(), "jwt".to_string(), "shop.example".to_string());
/// let jar = clear_session_cookie(jar, "shop.example".to_string());
/// assert_eq!(jar.get(VITRINE_SESSION).unwrap().max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar, domain: String) -> CookieJar {
    jar.add(base_cookie(
        VITRINE_SESSION,
        String::new(),
        domain,
        Duration::ZERO,
    ))
}

/// Set the cart id cookie.
pub fn set_cart_cookie(jar: CookieJar, cart_id: String, domain: String) -> CookieJar {
    jar.add(base_cookie(
        VITRINE_CART,
        cart_id,
        domain,
        Duration::seconds(CART_TTL_SECS as i64),
    ))
}
