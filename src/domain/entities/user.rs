//! User record entity as stored by the external record store.

use serde::{Deserialize, Serialize};

/// A user entity from the `users` collection.
///
/// Only the fields the admin login reads are kept; anything else the store
/// returns is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    /// Forces a password change before the dashboard is reachable.
    #[serde(default)]
    pub first_connection: bool,
}

impl UserRecord {
    /// Creates a new UserRecord instance.
    pub fn new(id: impl Into<String>, email: impl Into<String>, first_connection: bool) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            first_connection,
        }
    }
}

/// Result of a successful password authentication.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthData {
    pub token: String,
    pub record: UserRecord,
}

/// Field set sent when a user replaces their initial password.
///
/// Serializes to the store's camelCase wire names.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub old_password: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(rename = "first_connection")]
    pub first_connection: bool,
}

impl PasswordChange {
    /// Builds the update that sets a new password and clears the first-connection flag.
    pub fn completing_first_connection(
        old_password: impl Into<String>,
        password: impl Into<String>,
        password_confirm: impl Into<String>,
    ) -> Self {
        Self {
            old_password: old_password.into(),
            password: password.into(),
            password_confirm: password_confirm.into(),
            first_connection: false,
        }
    }
}
