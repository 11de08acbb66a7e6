//! JSON endpoint handlers.

pub mod health;
pub mod me;

pub use health::health_handler;
pub use me::me_handler;
