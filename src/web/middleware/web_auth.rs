//! Cookie-based authentication middleware for the admin dashboard.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::domain::entities::UserRecord;
use crate::domain::login_flow::LOGIN_PATH;
use crate::state::AppState;
use crate::web::session_cookie::current_session;

/// The signed-in user, inserted as a request extension by [`layer`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

/// Admits dashboard requests from browsers with a usable session.
///
/// # Cookie Format
///
/// ```text
/// Cookie: club_admin_session=<id>.<hmac>
/// ```
///
/// # Authentication Flow
///
/// 1. Resolve the session named by the `club_admin_session` cookie
/// 2. Require an unexpired record store token
/// 3. Require the account to have left its first connection
/// 4. On success, insert the [`crate::infrastructure::session::Session`] and
///    [`CurrentUser`] extensions and continue to the handler
///
/// Anything else is redirected to `/admin/login`, where the login screen
/// decides which step to show.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::web::middleware::web_auth;
///
/// let protected = Router::new()
///     .route("/admin/dashboard", get(dashboard_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), web_auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, Redirect> {
    let session = current_session(&st, &jar).ok_or_else(|| Redirect::to(LOGIN_PATH))?;
    let user = st
        .login_service
        .dashboard_user(&session)
        .ok_or_else(|| Redirect::to(LOGIN_PATH))?;

    req.extensions_mut().insert(session);
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
