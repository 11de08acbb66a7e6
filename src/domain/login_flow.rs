//! Login screen state machine.
//!
//! The screen has two steps: the credential form and the forced
//! new-password form shown when the record store flags the account with
//! `first_connection`. Every method here is synchronous and free of I/O;
//! [`crate::application::services::LoginService`] performs the backend calls
//! and feeds their outcome back in.
//!
//! ```text
//!            mount (valid session, first_connection)
//!   ┌───────┐ ─────────────────────────────────────▶ ┌──────────────┐
//!   │ Login │        login ok + first_connection      │ NewPassword  │
//!   └───────┘ ─────────────────────────────────────▶ └──────────────┘
//!     │  ▲ login failed                                │   ▲ rejected / update failed
//!     │  └─────────                                    │   └──────────
//!     │ login ok                                       │ updated + re-login ok
//!     ▼                                                ▼
//!   dashboard                                       dashboard
//! ```

use chrono::{DateTime, Utc};

use crate::domain::auth_store::AuthStore;
use crate::domain::entities::notice::{
    self, INCORRECT_CREDENTIALS, PASSWORD_MISMATCH, PASSWORD_TOO_SHORT, UPDATE_FAILED,
};
use crate::domain::entities::{Notice, UserRecord};

/// Minimum length of a new password, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const LOGIN_PATH: &str = "/admin/login";
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

/// Which form the login screen shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Step {
    #[default]
    Login,
    NewPassword,
}

/// What the caller should do after feeding an event to the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Show the login screen at the given step.
    Render(Step),
    /// Leave the login screen for the dashboard, optionally carrying a notice.
    Dashboard(Option<Notice>),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("a submission is already in progress")]
    Busy,
}

/// Local form state of the login screen.
#[derive(Debug, Default)]
pub struct LoginScreen {
    step: Step,
    email: String,
    /// Password typed at the login step, reused as the old password when the
    /// account must pick a new one. Only populated while `step` is `NewPassword`.
    password: Option<String>,
    loading: bool,
    notice: Option<Notice>,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Old password remembered from the login step, if any.
    pub fn current_password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Removes the pending notice so it renders only once.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Runs the mount check against the browser's current session.
    ///
    /// Only the `Login` step consults the session; a screen already asking
    /// for a new password stays there.
    pub fn mount(&mut self, auth: &AuthStore, now: DateTime<Utc>) -> Transition {
        if self.step == Step::Login && auth.is_valid(now) {
            if auth.record().is_some_and(|r| r.first_connection) {
                self.step = Step::NewPassword;
            } else {
                return Transition::Dashboard(None);
            }
        }
        Transition::Render(self.step)
    }

    /// Marks a submission as started.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Busy`] when another submission has not finished.
    pub fn begin_submit(&mut self) -> Result<(), FlowError> {
        if self.loading {
            return Err(FlowError::Busy);
        }
        self.loading = true;
        Ok(())
    }

    pub fn end_submit(&mut self) {
        self.loading = false;
    }

    /// Records the email typed into the login form so it survives a re-render.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn login_succeeded(&mut self, record: &UserRecord, password: String) -> Transition {
        if record.first_connection {
            self.step = Step::NewPassword;
            self.password = Some(password);
            self.notice = Some(notice::WELCOME);
            Transition::Render(Step::NewPassword)
        } else {
            self.discard_form();
            Transition::Dashboard(Some(notice::SIGNED_IN))
        }
    }

    pub fn login_failed(&mut self) -> Transition {
        self.notice = Some(INCORRECT_CREDENTIALS);
        Transition::Render(self.step)
    }

    /// Checks a new password and its confirmation before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns the notice to show when the password is shorter than
    /// [`MIN_PASSWORD_LENGTH`] characters or differs from the confirmation.
    pub fn check_new_password(new_password: &str, confirmation: &str) -> Result<(), Notice> {
        if new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(PASSWORD_TOO_SHORT);
        }
        if new_password != confirmation {
            return Err(PASSWORD_MISMATCH);
        }
        Ok(())
    }

    /// Shows `notice` without changing step.
    pub fn reject(&mut self, notice: Notice) -> Transition {
        self.notice = Some(notice);
        Transition::Render(self.step)
    }

    pub fn password_updated(&mut self) -> Transition {
        self.discard_form();
        Transition::Dashboard(Some(notice::PASSWORD_UPDATED))
    }

    pub fn password_update_failed(&mut self) -> Transition {
        self.reject(UPDATE_FAILED)
    }

    /// Forgets everything typed so far; the in-flight marker is left alone.
    fn discard_form(&mut self) {
        self.step = Step::Login;
        self.email.clear();
        self.password = None;
        self.notice = None;
    }
}
