//! Login and first-connection password change.

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::api::dto::login::{LoginForm, NewPasswordForm};
use crate::domain::entities::notice::SUBMISSION_IN_PROGRESS;
use crate::domain::entities::{PasswordChange, UserRecord};
use crate::domain::login_flow::{FlowError, LoginScreen, Step, Transition};
use crate::domain::repositories::AuthBackend;
use crate::error::AppError;
use crate::infrastructure::session::Session;

/// Drives the login screen against the record store.
///
/// Every backend failure is logged here and reduced to one of the two generic
/// notices; callers only ever see a [`Transition`].
pub struct LoginService {
    backend: Arc<dyn AuthBackend>,
    users_collection: String,
}

/// Keeps the screen's `loading` flag set for as long as it lives.
struct SubmitGuard<'a> {
    session: &'a Session,
}

impl<'a> SubmitGuard<'a> {
    fn acquire(session: &'a Session) -> Result<Self, FlowError> {
        session.lock().screen.begin_submit()?;
        Ok(Self { session })
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.session.lock().screen.end_submit();
    }
}

impl LoginService {
    /// Creates a new login service.
    ///
    /// # Arguments
    ///
    /// - `backend` - record store client
    /// - `users_collection` - collection holding admin accounts
    pub fn new(backend: Arc<dyn AuthBackend>, users_collection: impl Into<String>) -> Self {
        Self {
            backend,
            users_collection: users_collection.into(),
        }
    }

    pub fn backend(&self) -> &Arc<dyn AuthBackend> {
        &self.backend
    }

    /// Runs the screen's mount check for this browser.
    pub fn mount(&self, session: &Session) -> Transition {
        let mut guard = session.lock();
        let state = &mut *guard;
        state.screen.mount(&state.auth, Utc::now())
    }

    /// Returns the signed-in user when they may use the dashboard.
    ///
    /// Accounts still flagged `first_connection` are not admitted.
    pub fn dashboard_user(&self, session: &Session) -> Option<UserRecord> {
        let state = session.lock();
        if !state.auth.is_valid(Utc::now()) {
            return None;
        }
        state
            .auth
            .record()
            .filter(|r| !r.first_connection)
            .cloned()
    }

    /// Handles the login form.
    pub async fn submit_login(&self, session: &Session, mut form: LoginForm) -> Transition {
        let _guard = match SubmitGuard::acquire(session) {
            Ok(guard) => guard,
            Err(FlowError::Busy) => return session.lock().screen.reject(SUBMISSION_IN_PROGRESS),
        };

        form.email = form.email.trim().to_string();
        session.lock().screen.set_email(form.email.clone());

        if let Err(e) = form.validate() {
            tracing::debug!(error = %e, "Login form rejected");
            metrics::counter!("club_admin_login_attempts_total", "outcome" => "invalid_form")
                .increment(1);
            let transition = session.lock().screen.login_failed();
            return transition;
        }

        let transition = match self.backend.login(&form.email, &form.password).await {
            Ok(auth) => {
                tracing::info!(
                    user_id = %auth.record.id,
                    first_connection = auth.record.first_connection,
                    "Admin login succeeded"
                );
                metrics::counter!("club_admin_login_attempts_total", "outcome" => "success")
                    .increment(1);

                let mut state = session.lock();
                let transition = state.screen.login_succeeded(&auth.record, form.password);
                state.auth.save(auth);
                transition
            }
            Err(e) => {
                tracing::warn!(error = %e, "Admin login failed");
                metrics::counter!("club_admin_login_attempts_total", "outcome" => "failure")
                    .increment(1);
                session.lock().screen.login_failed()
            }
        };

        self.finish(session, transition)
    }

    /// Handles the new-password form.
    ///
    /// Only accepted while the screen is at the new-password step; from any
    /// other step the screen is rendered again and the store is not called.
    /// Validation failures are answered before anything is sent to the store.
    /// On success the password is changed, then the user logs in again with the
    /// new password so the session holds a token the store still accepts.
    pub async fn submit_new_password(&self, session: &Session, form: NewPasswordForm) -> Transition {
        let step = session.lock().screen.step();
        if step != Step::NewPassword {
            tracing::warn!(?step, "New password submitted outside the new-password step");
            return Transition::Render(step);
        }

        let _guard = match SubmitGuard::acquire(session) {
            Ok(guard) => guard,
            Err(FlowError::Busy) => return session.lock().screen.reject(SUBMISSION_IN_PROGRESS),
        };

        if let Err(notice) =
            LoginScreen::check_new_password(&form.new_password, &form.confirm_password)
        {
            let transition = session.lock().screen.reject(notice);
            return transition;
        }

        let transition = match self.change_password(session, &form).await {
            Ok(()) => {
                metrics::counter!("club_admin_password_changes_total", "outcome" => "success")
                    .increment(1);
                session.lock().screen.password_updated()
            }
            Err(e) => {
                tracing::error!(error = %e, "First-connection password change failed");
                metrics::counter!("club_admin_password_changes_total", "outcome" => "failure")
                    .increment(1);
                session.lock().screen.password_update_failed()
            }
        };

        self.finish(session, transition)
    }

    async fn change_password(&self, session: &Session, form: &NewPasswordForm) -> Result<(), AppError> {
        let (token, record, old_password) = {
            let state = session.lock();
            let record = state
                .auth
                .record()
                .cloned()
                .ok_or_else(|| AppError::internal("No current user", json!({})))?;
            let token = state.auth.token().unwrap_or_default().to_string();
            let old_password = form
                .current_password()
                .or(state.screen.current_password())
                .map(str::to_string)
                .ok_or_else(|| {
                    AppError::bad_request("Current password is unknown", json!({ "user_id": record.id }))
                })?;
            (token, record, old_password)
        };

        let fields = PasswordChange::completing_first_connection(
            old_password,
            form.new_password.as_str(),
            form.confirm_password.as_str(),
        );
        self.backend
            .update_record(&token, &self.users_collection, &record.id, &fields)
            .await?;
        tracing::info!(user_id = %record.id, "Password changed, signing in again");

        let auth = self.backend.login(&record.email, &form.new_password).await?;
        session.lock().auth.save(auth);

        Ok(())
    }

    /// Moves a dashboard-bound notice into the session flash.
    fn finish(&self, session: &Session, transition: Transition) -> Transition {
        if let Transition::Dashboard(Some(notice)) = &transition {
            session.lock().flash = Some(notice.clone());
        }
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth_store::tests::jwt_expiring_at;
    use crate::domain::entities::notice::{
        INCORRECT_CREDENTIALS, PASSWORD_MISMATCH, PASSWORD_TOO_SHORT, PASSWORD_UPDATED, SIGNED_IN,
        UPDATE_FAILED, WELCOME,
    };
    use crate::domain::entities::AuthData;
    use crate::domain::repositories::{BackendError, MockAuthBackend};
    use crate::infrastructure::session::SessionStore;
    use chrono::Duration;
    use mockall::Sequence;
    use mockall::predicate::eq;

    fn sessions() -> SessionStore {
        SessionStore::new("test-session-secret".to_string(), std::time::Duration::from_secs(3600))
    }

    fn auth_data(token: String, first_connection: bool) -> AuthData {
        AuthData {
            token,
            record: UserRecord::new("u1", "coach@club.fr", first_connection),
        }
    }

    fn fresh_token() -> String {
        jwt_expiring_at(Utc::now() + Duration::hours(1))
    }

    fn login_form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn password_form(new_password: &str, confirm_password: &str) -> NewPasswordForm {
        NewPasswordForm {
            new_password: new_password.to_string(),
            confirm_password: confirm_password.to_string(),
            current_password: None,
        }
    }

    fn rejected() -> BackendError {
        BackendError::Status {
            status: 400,
            message: "Failed to authenticate.".to_string(),
        }
    }

    fn service(mock: MockAuthBackend) -> LoginService {
        LoginService::new(Arc::new(mock), "users")
    }

    /// Puts a session at the new-password step as a real login would.
    fn at_new_password_step(session: &Session, token: String) {
        let mut state = session.lock();
        let auth = auth_data(token, true);
        state.screen.login_succeeded(&auth.record, "initial-pass".to_string());
        state.screen.take_notice();
        state.auth.save(auth);
    }

    #[tokio::test]
    async fn test_login_with_first_connection_shows_password_step() {
        let mut mock = MockAuthBackend::new();
        let token = fresh_token();
        let returned = auth_data(token.clone(), true);
        mock.expect_login()
            .with(eq("coach@club.fr"), eq("initial-pass"))
            .times(1)
            .returning(move |_, _| Ok(returned.clone()));

        let store = sessions();
        let (session, _) = store.create();
        let service = service(mock);

        let transition = service
            .submit_login(&session, login_form(" coach@club.fr ", "initial-pass"))
            .await;

        assert_eq!(transition, Transition::Render(Step::NewPassword));
        let mut state = session.lock();
        assert_eq!(state.screen.take_notice(), Some(WELCOME));
        assert_eq!(state.auth.token(), Some(token.as_str()));
        assert!(!state.screen.loading());
        assert!(state.flash.is_none());
    }

    #[tokio::test]
    async fn test_login_without_first_connection_goes_to_dashboard() {
        let mut mock = MockAuthBackend::new();
        let returned = auth_data(fresh_token(), false);
        mock.expect_login()
            .times(1)
            .returning(move |_, _| Ok(returned.clone()));

        let store = sessions();
        let (session, _) = store.create();
        let service = service(mock);

        let transition = service
            .submit_login(&session, login_form("coach@club.fr", "secret"))
            .await;

        assert_eq!(transition, Transition::Dashboard(Some(SIGNED_IN)));
        assert_eq!(session.lock().flash, Some(SIGNED_IN));
        assert_eq!(service.dashboard_user(&session).unwrap().id, "u1");
    }

    #[tokio::test]
    async fn test_login_failure_shows_generic_notice() {
        let mut mock = MockAuthBackend::new();
        mock.expect_login().times(1).returning(|_, _| Err(rejected()));

        let store = sessions();
        let (session, _) = store.create();
        let service = service(mock);

        let transition = service
            .submit_login(&session, login_form("coach@club.fr", "wrong"))
            .await;

        assert_eq!(transition, Transition::Render(Step::Login));
        let mut state = session.lock();
        assert_eq!(state.screen.take_notice(), Some(INCORRECT_CREDENTIALS));
        assert_eq!(state.screen.email(), "coach@club.fr");
        assert!(!state.screen.loading());
        assert!(state.auth.record().is_none());
    }

    #[tokio::test]
    async fn test_invalid_email_never_reaches_backend() {
        let mut mock = MockAuthBackend::new();
        mock.expect_login().times(0);

        let store = sessions();
        let (session, _) = store.create();
        let service = service(mock);

        let transition = service
            .submit_login(&session, login_form("coach", "secret"))
            .await;

        assert_eq!(transition, Transition::Render(Step::Login));
        assert_eq!(
            session.lock().screen.take_notice(),
            Some(INCORRECT_CREDENTIALS)
        );
    }

    #[tokio::test]
    async fn test_short_password_never_reaches_backend() {
        let mut mock = MockAuthBackend::new();
        mock.expect_update_record().times(0);
        mock.expect_login().times(0);

        let store = sessions();
        let (session, _) = store.create();
        at_new_password_step(&session, fresh_token());
        let service = service(mock);

        let transition = service
            .submit_new_password(&session, password_form("short", "short"))
            .await;

        assert_eq!(transition, Transition::Render(Step::NewPassword));
        let mut state = session.lock();
        assert_eq!(state.screen.take_notice(), Some(PASSWORD_TOO_SHORT));
        assert!(!state.screen.loading());
    }

    #[tokio::test]
    async fn test_mismatched_password_never_reaches_backend() {
        let mut mock = MockAuthBackend::new();
        mock.expect_update_record().times(0);
        mock.expect_login().times(0);

        let store = sessions();
        let (session, _) = store.create();
        at_new_password_step(&session, fresh_token());
        let service = service(mock);

        let transition = service
            .submit_new_password(&session, password_form("new-password-1", "new-password-2"))
            .await;

        assert_eq!(transition, Transition::Render(Step::NewPassword));
        assert_eq!(session.lock().screen.take_notice(), Some(PASSWORD_MISMATCH));
    }

    #[tokio::test]
    async fn test_password_change_signs_in_again_with_new_password() {
        let old_token = fresh_token();
        let new_token = jwt_expiring_at(Utc::now() + Duration::hours(2));
        let mut seq = Sequence::new();
        let mut mock = MockAuthBackend::new();

        let expected_token = old_token.clone();
        mock.expect_update_record()
            .withf(move |token, collection, id, fields| {
                token == expected_token
                    && collection == "users"
                    && id == "u1"
                    && fields.old_password == "initial-pass"
                    && fields.password == "new-password"
                    && fields.password_confirm == "new-password"
                    && !fields.first_connection
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(UserRecord::new("u1", "coach@club.fr", false)));

        let returned = auth_data(new_token.clone(), false);
        mock.expect_login()
            .with(eq("coach@club.fr"), eq("new-password"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, _| Ok(returned.clone()));

        let store = sessions();
        let (session, _) = store.create();
        at_new_password_step(&session, old_token);
        let service = service(mock);

        let transition = service
            .submit_new_password(&session, password_form("new-password", "new-password"))
            .await;

        assert_eq!(transition, Transition::Dashboard(Some(PASSWORD_UPDATED)));
        let state = session.lock();
        assert_eq!(state.auth.token(), Some(new_token.as_str()));
        assert_eq!(state.flash, Some(PASSWORD_UPDATED));
        assert_eq!(state.screen.step(), Step::Login);
        assert!(state.screen.current_password().is_none());
        drop(state);
        assert!(service.dashboard_user(&session).is_some());
    }

    #[tokio::test]
    async fn test_update_failure_stays_on_password_step() {
        let mut mock = MockAuthBackend::new();
        mock.expect_update_record()
            .times(1)
            .returning(|_, _, _, _| Err(rejected()));
        mock.expect_login().times(0);

        let store = sessions();
        let (session, _) = store.create();
        at_new_password_step(&session, fresh_token());
        let service = service(mock);

        let transition = service
            .submit_new_password(&session, password_form("new-password", "new-password"))
            .await;

        assert_eq!(transition, Transition::Render(Step::NewPassword));
        let mut state = session.lock();
        assert_eq!(state.screen.take_notice(), Some(UPDATE_FAILED));
        assert!(state.flash.is_none());
        assert!(!state.screen.loading());
    }

    #[tokio::test]
    async fn test_relogin_failure_reports_update_failed() {
        let mut mock = MockAuthBackend::new();
        mock.expect_update_record()
            .times(1)
            .returning(|_, _, _, _| Ok(UserRecord::new("u1", "coach@club.fr", false)));
        mock.expect_login()
            .times(1)
            .returning(|_, _| Err(BackendError::Request("connection reset".to_string())));

        let store = sessions();
        let (session, _) = store.create();
        at_new_password_step(&session, fresh_token());
        let service = service(mock);

        let transition = service
            .submit_new_password(&session, password_form("new-password", "new-password"))
            .await;

        assert_eq!(transition, Transition::Render(Step::NewPassword));
        assert_eq!(session.lock().screen.take_notice(), Some(UPDATE_FAILED));
    }

    #[tokio::test]
    async fn test_password_change_without_current_user_fails() {
        let mut mock = MockAuthBackend::new();
        mock.expect_update_record().times(0);
        mock.expect_login().times(0);

        let store = sessions();
        let (session, _) = store.create();
        at_new_password_step(&session, fresh_token());
        session.lock().auth.clear();
        let service = service(mock);

        let transition = service
            .submit_new_password(&session, password_form("new-password", "new-password"))
            .await;

        assert_eq!(transition, Transition::Render(Step::NewPassword));
        assert_eq!(session.lock().screen.take_notice(), Some(UPDATE_FAILED));
    }

    #[tokio::test]
    async fn test_new_password_refused_outside_password_step() {
        let mut mock = MockAuthBackend::new();
        mock.expect_update_record().times(0);
        mock.expect_login().times(0);

        let store = sessions();
        let (session, _) = store.create();
        session.lock().auth.save(auth_data(fresh_token(), false));
        let service = service(mock);

        let mut form = password_form("new-password", "new-password");
        form.current_password = Some("old-password".to_string());
        let transition = service.submit_new_password(&session, form).await;

        assert_eq!(transition, Transition::Render(Step::Login));
        let mut state = session.lock();
        assert_eq!(state.screen.take_notice(), None);
        assert!(state.flash.is_none());
        assert!(!state.screen.loading());
    }

    #[tokio::test]
    async fn test_new_password_from_anonymous_browser_is_ignored() {
        let mut mock = MockAuthBackend::new();
        mock.expect_update_record().times(0);
        mock.expect_login().times(0);

        let store = sessions();
        let (session, _) = store.create();
        let service = service(mock);

        let transition = service
            .submit_new_password(&session, password_form("new-password", "new-password"))
            .await;

        assert_eq!(transition, Transition::Render(Step::Login));
        assert_eq!(session.lock().screen.take_notice(), None);
    }

    #[tokio::test]
    async fn test_resumed_session_uses_submitted_current_password() {
        let mut mock = MockAuthBackend::new();
        mock.expect_update_record()
            .withf(|_, _, _, fields| fields.old_password == "typed-again")
            .times(1)
            .returning(|_, _, _, _| Ok(UserRecord::new("u1", "coach@club.fr", false)));
        let returned = auth_data(fresh_token(), false);
        mock.expect_login()
            .times(1)
            .returning(move |_, _| Ok(returned.clone()));

        let store = sessions();
        let (session, _) = store.create();
        session.lock().auth.save(auth_data(fresh_token(), true));
        let service = service(mock);

        assert_eq!(service.mount(&session), Transition::Render(Step::NewPassword));
        assert!(service.dashboard_user(&session).is_none());

        let mut form = password_form("new-password", "new-password");
        form.current_password = Some("typed-again".to_string());
        let transition = service.submit_new_password(&session, form).await;

        assert_eq!(transition, Transition::Dashboard(Some(PASSWORD_UPDATED)));
    }

    #[tokio::test]
    async fn test_submission_refused_while_another_is_in_flight() {
        let mut mock = MockAuthBackend::new();
        mock.expect_login().times(0);

        let store = sessions();
        let (session, _) = store.create();
        let service = service(mock);

        let guard = SubmitGuard::acquire(&session).unwrap();
        assert!(session.lock().screen.loading());

        let transition = service
            .submit_login(&session, login_form("coach@club.fr", "secret"))
            .await;

        assert_eq!(transition, Transition::Render(Step::Login));
        assert_eq!(
            session.lock().screen.take_notice(),
            Some(SUBMISSION_IN_PROGRESS)
        );
        assert!(session.lock().screen.loading());

        drop(guard);
        assert!(!session.lock().screen.loading());
    }
}
