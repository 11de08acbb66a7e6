//! Record store client.

mod client;

pub use client::PocketBaseClient;
