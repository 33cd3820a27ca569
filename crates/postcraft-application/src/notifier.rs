//! Notifier implementations.

use postcraft_core::notification::{Notification, NotificationLevel, Notifier};
use tokio::sync::mpsc;

/// Forwards notifications to a front end over an unbounded channel.
#[derive(Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if let Err(e) = self.sender.send(notification) {
            tracing::debug!("Notification dropped, receiver closed: {}", e.0);
        }
    }
}

/// Writes notifications to the log only. Used by one-shot commands.
#[derive(Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => tracing::info!(notice = %notification.message),
            NotificationLevel::Success => tracing::info!(success = %notification.message),
            NotificationLevel::Error => tracing::warn!(error = %notification.message),
        }
    }
}
