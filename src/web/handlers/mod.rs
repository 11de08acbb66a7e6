//! HTML template rendering handlers for the admin pages.

mod dashboard;
mod login;
mod logout;

pub use dashboard::dashboard_handler;
pub use login::{login_page, login_submit, password_submit};
pub use logout::logout_handler;
