//! Handler returning the signed-in user.

use axum::{Json, extract::State};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::domain::entities::UserRecord;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::session_cookie::current_session;

/// Returns the record of the user signed in on this browser.
///
/// # Endpoint
///
/// `GET /admin/api/me`
///
/// # Errors
///
/// Returns `401 Unauthorized` when the browser has no valid session, or the
/// account has not yet replaced its first-connection password.
pub async fn me_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<UserRecord>, AppError> {
    current_session(&state, &jar)
        .and_then(|session| state.login_service.dashboard_user(&session))
        .map(Json)
        .ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "No signed-in user for this session"}),
            )
        })
}
