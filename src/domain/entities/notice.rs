//! User-facing notices shown once on the next rendered page.

use std::borrow::Cow;

/// Severity of a notice, mapped to a CSS class by the templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl NoticeLevel {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Info => "notice-info",
            Self::Success => "notice-success",
            Self::Error => "notice-error",
        }
    }
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: Cow<'static, str>,
}

impl Notice {
    pub const fn info(message: &'static str) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: Cow::Borrowed(message),
        }
    }

    pub const fn success(message: &'static str) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: Cow::Borrowed(message),
        }
    }

    pub const fn error(message: &'static str) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: Cow::Borrowed(message),
        }
    }

    pub fn css_class(&self) -> &'static str {
        self.level.css_class()
    }
}

pub const WELCOME: Notice = Notice::info("Welcome! Please choose your personal password.");
pub const SIGNED_IN: Notice = Notice::success("Signed in");
pub const PASSWORD_UPDATED: Notice = Notice::success("Password updated!");
pub const INCORRECT_CREDENTIALS: Notice = Notice::error("Incorrect credentials");
pub const UPDATE_FAILED: Notice = Notice::error("Update failed");
pub const PASSWORD_TOO_SHORT: Notice = Notice::error("Password must be at least 8 characters");
pub const PASSWORD_MISMATCH: Notice = Notice::error("Passwords do not match");
pub const SUBMISSION_IN_PROGRESS: Notice = Notice::error("A submission is already in progress");
