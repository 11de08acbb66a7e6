//! Server-side browser sessions.

pub mod store;

pub use store::{BrowserSession, Session, SessionStore, run_session_sweeper};
