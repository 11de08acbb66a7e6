//! Trait definitions for the domain layer's external collaborators.
//!
//! These traits abstract the record store the login screen talks to. Concrete
//! clients live in `crate::infrastructure`.
//!
//! # Architecture
//!
//! - Traits define the contract for remote operations
//! - Implementations live in `crate::infrastructure::pocketbase`
//! - Mock implementations are auto-generated via `mockall` for testing

pub mod auth_backend;

pub use auth_backend::{AuthBackend, BackendError};

#[cfg(test)]
pub use auth_backend::MockAuthBackend;
