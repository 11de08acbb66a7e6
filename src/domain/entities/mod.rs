//! Core domain entities for the admin login.
//!
//! Entities are plain data structures; the state machine that moves between
//! login steps lives in [`crate::domain::login_flow`].
//!
//! # Entity Types
//!
//! - [`UserRecord`] - A user as returned by the record store
//! - [`AuthData`] - Token and record from a successful login
//! - [`PasswordChange`] - Fields sent when replacing the initial password
//! - [`Notice`] - A one-shot message shown to the user

pub mod notice;
pub mod user;

pub use notice::{Notice, NoticeLevel};
pub use user::{AuthData, PasswordChange, UserRecord};
