//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for the record store and browser sessions.
//!
//! # Modules
//!
//! - [`pocketbase`] - HTTP client for the PocketBase-compatible record store
//! - [`session`] - In-memory browser sessions with signed cookie ids

pub mod pocketbase;
pub mod session;
