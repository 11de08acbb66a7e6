//! Admin web route configuration.

use crate::state::AppState;
use crate::web::handlers::{
    dashboard_handler, login_page, login_submit, logout_handler, password_submit,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Protected admin routes requiring a signed-in account past its first connection.
///
/// Protected via [`crate::web::middleware::web_auth`] (cookie session).
///
/// # Endpoints
///
/// - `GET /dashboard` - Dashboard home
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard_handler))
}

/// Login screen routes without authentication.
///
/// # Endpoints
///
/// - `GET /login` - Login page (either step)
/// - `POST /login` - Credential form
/// - `POST /login/password` - First-connection new-password form
/// - `POST /logout` - Sign out
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .route("/login/password", post(password_submit))
        .route("/logout", post(logout_handler))
}
