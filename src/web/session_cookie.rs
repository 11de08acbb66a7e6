//! Session cookie handling shared by the web handlers.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::infrastructure::session::Session;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "club_admin_session";

/// Builds the cookie carrying a signed session id.
///
/// No `Max-Age`: the server expires idle sessions on its own.
pub fn session_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Builds a cookie that makes the browser drop its session id.
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

/// Resolves the browser's session from its cookie, if it has a live one.
pub fn current_session(state: &AppState, jar: &CookieJar) -> Option<Session> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| state.sessions.get(cookie.value()))
}

/// Resolves the browser's session, starting one (and setting its cookie) when needed.
pub fn session_or_new(state: &AppState, jar: CookieJar) -> (Session, CookieJar) {
    let cookie_value = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let (session, new_cookie) = state.sessions.get_or_create(cookie_value.as_deref());

    match new_cookie {
        Some(value) => (session, jar.add(session_cookie(value, state.cookie_secure))),
        None => (session, jar),
    }
}
