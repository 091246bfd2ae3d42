//! Driven port for user-facing notifications (toasts, banners, console lines).
//!
//! Notifications are fire-and-forget: the core never waits on, or reacts to,
//! the sink.

use std::fmt;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The requested action completed.
    Success,
    /// Something degraded but the user can carry on.
    Warning,
    /// The requested action failed.
    Error,
}

impl Severity {
    /// Lower-case label used by text adapters.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One notification as delivered to channel-based sinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Presentation severity.
    pub severity: Severity,
    /// Message shown to the user.
    pub message: String,
}

/// Port accepting `(severity, message)` pairs.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Publish a notification.
    fn notify(&self, severity: Severity, message: &str);
}
