//! Data Transfer Objects for requests and responses.
//!
//! All DTOs use Serde for (de)serialization; form bodies are checked with
//! validator before anything reaches the record store.

pub mod health;
pub mod login;
