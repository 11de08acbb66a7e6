#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, middleware};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use club_admin::application::services::LoginService;
use club_admin::config::ClubIdentity;
use club_admin::domain::entities::{AuthData, PasswordChange, UserRecord};
use club_admin::domain::repositories::{AuthBackend, BackendError};
use club_admin::infrastructure::session::SessionStore;
use club_admin::state::AppState;
use club_admin::web::{middleware::web_auth, routes};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_SESSION_SECRET: &str = "test-session-secret-0123456789";
pub const CLUB_NAME: &str = "FC Test";

/// Builds an unsigned JWT whose payload carries `exp`.
pub fn jwt_expiring_in(user_id: &str, lifetime: Duration) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = json!({
        "id": user_id,
        "exp": (Utc::now() + lifetime).timestamp(),
    });
    let payload = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{payload}.signature")
}

struct Account {
    record: UserRecord,
    password: String,
}

/// In-memory record store with PocketBase-like behavior.
///
/// Tokens are invalidated when a password changes, and every call is counted.
#[derive(Default)]
pub struct FakeBackend {
    accounts: Mutex<HashMap<String, Account>>,
    tokens: Mutex<HashMap<String, String>>,
    token_lifetime_secs: Mutex<Option<i64>>,
    fail_updates: AtomicBool,
    down: AtomicBool,
    pub login_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, id: &str, email: &str, password: &str, first_connection: bool) -> Self {
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                record: UserRecord::new(id, email, first_connection),
                password: password.to_string(),
            },
        );
        self
    }

    /// Issues tokens that are already expired.
    pub fn issuing_expired_tokens(self) -> Self {
        *self.token_lifetime_secs.lock().unwrap() = Some(-60);
        self
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    pub fn go_down(&self) {
        self.down.store(true, Ordering::SeqCst);
    }

    pub fn logins(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn record(&self, email: &str) -> Option<UserRecord> {
        self.accounts
            .lock()
            .unwrap()
            .get(email)
            .map(|a| a.record.clone())
    }

    pub fn password(&self, email: &str) -> Option<String> {
        self.accounts
            .lock()
            .unwrap()
            .get(email)
            .map(|a| a.password.clone())
    }

    fn rejected(message: &str) -> BackendError {
        BackendError::Status {
            status: 400,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl AuthBackend for FakeBackend {
    async fn login(&self, email: &str, password: &str) -> Result<AuthData, BackendError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);

        let accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get(email)
            .filter(|a| a.password == password)
            .ok_or_else(|| Self::rejected("Failed to authenticate."))?;

        let lifetime = self.token_lifetime_secs.lock().unwrap().unwrap_or(3600);
        let token = jwt_expiring_in(&account.record.id, Duration::seconds(lifetime));
        self.tokens
            .lock()
            .unwrap()
            .insert(token.clone(), account.record.id.clone());

        Ok(AuthData {
            token,
            record: account.record.clone(),
        })
    }

    async fn update_record(
        &self,
        token: &str,
        _collection: &str,
        id: &str,
        fields: &PasswordChange,
    ) -> Result<UserRecord, BackendError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(Self::rejected("Failed to update record."));
        }

        if self.tokens.lock().unwrap().get(token).map(String::as_str) != Some(id) {
            return Err(BackendError::Status {
                status: 401,
                message: "The request requires valid record authorization token.".to_string(),
            });
        }

        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .values_mut()
            .find(|a| a.record.id == id)
            .ok_or_else(|| BackendError::Status {
                status: 404,
                message: "The requested resource wasn't found.".to_string(),
            })?;

        if account.password != fields.old_password || fields.password != fields.password_confirm {
            return Err(Self::rejected("Failed to update record."));
        }

        account.password = fields.password.clone();
        account.record.first_connection = fields.first_connection;
        self.tokens.lock().unwrap().retain(|_, owner| owner != id);

        Ok(account.record.clone())
    }

    async fn health(&self) -> Result<(), BackendError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(BackendError::Request("connection refused".to_string()));
        }
        Ok(())
    }
}

pub fn create_test_state(backend: Arc<FakeBackend>) -> AppState {
    let login_service = Arc::new(LoginService::new(backend, "users"));
    let sessions = Arc::new(SessionStore::new(
        TEST_SESSION_SECRET.to_string(),
        std::time::Duration::from_secs(3600),
    ));
    let club = ClubIdentity {
        name: CLUB_NAME.to_string(),
        logo_url: "/static/logo.svg".to_string(),
    };

    AppState::new(login_service, sessions, club, false)
}

/// The admin pages as mounted by the server, without rate limiting.
pub fn admin_router(state: AppState) -> Router {
    let protected = routes::protected_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        web_auth::layer,
    ));

    Router::new()
        .nest(
            "/admin",
            routes::public_routes()
                .merge(protected)
                .nest("/api", club_admin::api::routes::session_routes()),
        )
        .with_state(state)
}
