//! Domain layer containing the login screen's entities and logic.
//!
//! Nothing in here performs I/O. The record store is reached through the
//! [`repositories::AuthBackend`] trait, implemented in the infrastructure layer.
//!
//! # Architecture
//!
//! - [`entities`] - User record, auth data, notices
//! - [`auth_store`] - Per-browser token and current user
//! - [`login_flow`] - The two-step login screen state machine
//! - [`repositories`] - Record store trait definition
//!
//! # Login Flow
//!
//! 1. The browser opens the login page; [`login_flow::LoginScreen::mount`] checks
//!    the browser's [`auth_store::AuthStore`]
//! 2. Credentials are submitted and sent to the store via
//!    [`crate::application::services::LoginService`]
//! 3. Accounts flagged `first_connection` must choose a new password before the
//!    dashboard is reachable

pub mod auth_store;
pub mod entities;
pub mod login_flow;
pub mod repositories;
