//! Login page and its two form submissions.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::api::dto::login::{LoginForm, NewPasswordForm};
use crate::domain::entities::Notice;
use crate::domain::login_flow::{DASHBOARD_PATH, LOGIN_PATH, Step, Transition};
use crate::infrastructure::session::Session;
use crate::state::AppState;
use crate::web::session_cookie::session_or_new;

/// Template for the login page.
///
/// Renders `templates/login.html` with either:
/// - the email / password form, or
/// - the first-connection new-password form
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub club_name: String,
    pub logo_url: String,
    pub new_password_step: bool,
    /// The login password is not known (step reached from an existing
    /// session), so the form must ask for it again.
    pub ask_current_password: bool,
    pub email: String,
    pub loading: bool,
    pub notice: Option<Notice>,
}

impl LoginTemplate {
    fn for_session(state: &AppState, session: &Session, step: Step) -> Self {
        let mut guard = session.lock();
        let screen = &mut guard.screen;

        Self {
            club_name: state.club.name.clone(),
            logo_url: state.club.logo_url.clone(),
            new_password_step: step == Step::NewPassword,
            ask_current_password: step == Step::NewPassword
                && screen.current_password().is_none(),
            email: screen.email().to_string(),
            loading: screen.loading(),
            notice: screen.take_notice(),
        }
    }
}

fn redirect_for(transition: &Transition) -> Redirect {
    match transition {
        Transition::Dashboard(_) => Redirect::to(DASHBOARD_PATH),
        Transition::Render(_) => Redirect::to(LOGIN_PATH),
    }
}

/// Renders the login page, or sends an already signed-in browser to the dashboard.
///
/// # Endpoint
///
/// `GET /admin/login`
pub async fn login_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (session, jar) = session_or_new(&state, jar);

    match state.login_service.mount(&session) {
        Transition::Dashboard(_) => (jar, Redirect::to(DASHBOARD_PATH)).into_response(),
        Transition::Render(step) => {
            (jar, LoginTemplate::for_session(&state, &session, step)).into_response()
        }
    }
}

/// Handles the credential form.
///
/// # Endpoint
///
/// `POST /admin/login`
///
/// Always answers `303 See Other`: to the dashboard on a plain login, back to
/// the login page otherwise (new-password step or error notice).
pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let (session, jar) = session_or_new(&state, jar);

    let transition = state.login_service.submit_login(&session, form).await;

    (jar, redirect_for(&transition)).into_response()
}

/// Handles the first-connection new-password form.
///
/// # Endpoint
///
/// `POST /admin/login/password`
pub async fn password_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<NewPasswordForm>,
) -> Response {
    let (session, jar) = session_or_new(&state, jar);

    let transition = state
        .login_service
        .submit_new_password(&session, form)
        .await;

    (jar, redirect_for(&transition)).into_response()
}
