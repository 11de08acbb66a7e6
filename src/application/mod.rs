//! Application layer services implementing the login logic.
//!
//! This layer orchestrates domain operations by feeding record store results
//! into the login screen state machine. Services consume the
//! [`crate::domain::repositories::AuthBackend`] trait and give web handlers a
//! single call per form submission.
//!
//! # Available Services
//!
//! - [`services::login_service::LoginService`] - Login and first-connection password change

pub mod services;
