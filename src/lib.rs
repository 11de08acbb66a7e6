//! # Club Admin
//!
//! Login screen of a club administration panel, with a forced password
//! change on first connection. Accounts live in an external PocketBase-compatible
//! record store; this crate renders the screens and drives the flow.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities, the login screen state machine, the record store trait
//! - **Application Layer** ([`application`]) - Form submission handling against the record store
//! - **Infrastructure Layer** ([`infrastructure`]) - Record store HTTP client, browser sessions
//! - **API Layer** ([`api`]) - Form DTOs, JSON handlers, middleware
//! - **Web Layer** ([`web`]) - HTML login and dashboard pages
//!
//! ## Login Flow
//!
//! - Valid credentials on a regular account lead to `/admin/dashboard`
//! - Accounts flagged `first_connection` must choose a password of at least
//!   8 characters; the account is then signed in again with it
//! - Failures show a generic notice; nothing tells which field was wrong
//!
//! ## Quick Start
//!
//! ```bash
//! export POCKETBASE_URL="http://127.0.0.1:8090"
//! export SESSION_SECRET="change-me-to-something-long"
//! export CLUB_NAME="FC Example"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;
pub mod web;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::LoginService;
    pub use crate::domain::entities::{AuthData, Notice, PasswordChange, UserRecord};
    pub use crate::domain::login_flow::{LoginScreen, Step, Transition};
    pub use crate::domain::repositories::{AuthBackend, BackendError};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
