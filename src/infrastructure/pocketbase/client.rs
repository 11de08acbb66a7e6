//! HTTP client for a PocketBase-compatible record store.
//!
//! Thin wrapper over three endpoints: password auth on the users collection,
//! record update, and the health probe. Requests carry no timeout and are
//! never retried; a failure surfaces to the caller as-is.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::entities::{AuthData, PasswordChange, UserRecord};
use crate::domain::repositories::{AuthBackend, BackendError};

pub struct PocketBaseClient {
    http: reqwest::Client,
    base_url: Url,
    users_collection: String,
}

impl PocketBaseClient {
    /// Creates a client for the store at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::HttpClientBuild`] if `base_url` is not an
    /// absolute http(s) URL or the HTTP client cannot be built.
    pub fn new(base_url: &str, users_collection: impl Into<String>) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BackendError::HttpClientBuild(format!("invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(BackendError::HttpClientBuild(format!(
                "base URL must be http or https, got '{base_url}'"
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::HttpClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            users_collection: users_collection.into(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, escaping each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::HttpClientBuild("base URL cannot take a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(status_error(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| BackendError::Parse(e.to_string()))
    }
}

#[async_trait]
impl AuthBackend for PocketBaseClient {
    async fn login(&self, email: &str, password: &str) -> Result<AuthData, BackendError> {
        let url = self.endpoint(&[
            "api",
            "collections",
            &self.users_collection,
            "auth-with-password",
        ])?;
        let body = AuthWithPasswordRequest {
            identity: email,
            password,
        };

        self.send(self.http.post(url).json(&body)).await
    }

    async fn update_record(
        &self,
        token: &str,
        collection: &str,
        id: &str,
        fields: &PasswordChange,
    ) -> Result<UserRecord, BackendError> {
        let url = self.endpoint(&["api", "collections", collection, "records", id])?;

        self.send(
            self.http
                .patch(url)
                .header(reqwest::header::AUTHORIZATION, token)
                .json(fields),
        )
        .await
    }

    async fn health(&self) -> Result<(), BackendError> {
        let url = self.endpoint(&["api", "health"])?;
        let _: serde_json::Value = self.send(self.http.get(url)).await?;
        Ok(())
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct AuthWithPasswordRequest<'a> {
    identity: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Builds a status error, preferring the store's own message when the body has one.
fn status_error(status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });

    BackendError::Status {
        status: status.as_u16(),
        message,
    }
}
