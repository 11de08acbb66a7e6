//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::LoginService;
use crate::config::ClubIdentity;
use crate::infrastructure::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub login_service: Arc<LoginService>,
    pub sessions: Arc<SessionStore>,
    pub club: Arc<ClubIdentity>,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(
        login_service: Arc<LoginService>,
        sessions: Arc<SessionStore>,
        club: ClubIdentity,
        cookie_secure: bool,
    ) -> Self {
        Self {
            login_service,
            sessions,
            club: Arc::new(club),
            cookie_secure,
        }
    }
}
