//! Sign-out handler.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;

use crate::domain::login_flow::LOGIN_PATH;
use crate::state::AppState;
use crate::web::session_cookie::{current_session, removal_cookie};

/// Drops the browser session and clears its cookie.
///
/// # Endpoint
///
/// `POST /admin/logout`
pub async fn logout_handler(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(session) = current_session(&state, &jar) {
        state.sessions.remove(session.id());
        tracing::info!("Admin signed out");
    }

    let jar = jar.add(removal_cookie(state.cookie_secure));
    (jar, Redirect::to(LOGIN_PATH))
}
