//! API route configuration.
//!
//! Each handler checks the browser session itself and answers `401` rather
//! than redirecting.

use crate::api::handlers::me_handler;
use crate::state::AppState;
use axum::{Router, routing::get};

/// JSON routes nested under `/admin/api`.
///
/// # Endpoints
///
/// - `GET /me` - Current signed-in user
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/me", get(me_handler))
}
