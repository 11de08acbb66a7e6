//! Contract for the external record store that owns user accounts.

use async_trait::async_trait;

use crate::domain::entities::{AuthData, PasswordChange, UserRecord};

/// Errors reported by a record store client.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The request never produced a response.
    #[error("backend request failed: {0}")]
    Request(String),

    /// The store answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not what the client expected.
    #[error("backend response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl BackendError {
    /// True for 4xx answers, i.e. the store rejected what was sent.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Status { status: 400..=499, .. })
    }
}

/// Record store operations used by the login screen.
///
/// # Implementations
///
/// - [`crate::infrastructure::pocketbase::PocketBaseClient`] - HTTP client for a PocketBase-compatible API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Authenticates with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Status`] when the credentials are rejected.
    async fn login(&self, email: &str, password: &str) -> Result<AuthData, BackendError>;

    /// Updates a record, authenticating with `token`.
    ///
    /// Changing a password invalidates `token`; callers must log in again.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Status`] when the store rejects the fields,
    /// for example a wrong old password.
    async fn update_record(
        &self,
        token: &str,
        collection: &str,
        id: &str,
        fields: &PasswordChange,
    ) -> Result<UserRecord, BackendError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error when the store does not answer or reports itself unhealthy.
    async fn health(&self) -> Result<(), BackendError>;
}
