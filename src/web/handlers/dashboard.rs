//! Dashboard home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Extension, extract::State, response::IntoResponse};

use crate::domain::entities::Notice;
use crate::infrastructure::session::Session;
use crate::state::AppState;
use crate::web::middleware::web_auth::CurrentUser;

/// Template for the dashboard home page.
///
/// Renders `templates/dashboard.html` with the club identity, the signed-in
/// user and the notice left by the login screen.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub club_name: String,
    pub logo_url: String,
    pub email: String,
    pub notice: Option<Notice>,
}

/// Renders the dashboard home page.
///
/// # Endpoint
///
/// `GET /admin/dashboard`
///
/// Only reachable through [`crate::web::middleware::web_auth::layer`], which
/// provides the session and user extensions.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> impl IntoResponse {
    let notice = session.lock().flash.take();

    DashboardTemplate {
        club_name: state.club.name.clone(),
        logo_url: state.club.logo_url.clone(),
        email: user.email,
        notice,
    }
}
