//! Form bodies posted by the login screen.

use serde::Deserialize;
use validator::Validate;

/// Credentials submitted from the login step.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// New password submitted from the first-connection step.
#[derive(Debug, Deserialize)]
pub struct NewPasswordForm {
    pub new_password: String,
    pub confirm_password: String,

    /// Only rendered when the step was reached from an existing session, where
    /// the password typed at login is not known.
    #[serde(default)]
    pub current_password: Option<String>,
}

impl NewPasswordForm {
    /// The submitted current password, treating an empty field as absent.
    pub fn current_password(&self) -> Option<&str> {
        self.current_password.as_deref().filter(|p| !p.is_empty())
    }
}
