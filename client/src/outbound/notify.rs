//! Notification sinks.

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::domain::ports::{Notification, Notifier, Severity};

/// Writes notifications to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success => info!(%severity, message, "notification"),
            Severity::Warning => warn!(%severity, message, "notification"),
            Severity::Error => error!(%severity, message, "notification"),
        }
    }
}

/// Forwards notifications to a receiver owned by a presentation layer.
///
/// Sending never blocks; notifications are dropped once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver it feeds.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        let notification = Notification {
            severity,
            message: message.to_owned(),
        };
        if self.sender.send(notification).is_err() {
            warn!(%severity, message, "notification receiver closed");
        }
    }
}
