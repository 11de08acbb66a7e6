//! Admin web layer for browser-based UI.
//!
//! Provides the login screen and the dashboard landing page.
//! Uses Askama templates for server-side rendering.
//!
//! # Modules
//!
//! - [`handlers`] - Template rendering and form handlers
//! - [`middleware`] - Web-specific middleware (session auth)
//! - [`routes`] - Admin route configuration
//! - [`session_cookie`] - Session cookie helpers

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session_cookie;
