pub mod calendar;
pub mod config;
pub mod probe;
pub mod upload;

use postcraft_core::notification::Notification;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::render;

/// Prints every notification queued so far and returns how many there were.
pub fn flush_notifications(receiver: &mut UnboundedReceiver<Notification>) -> usize {
    let mut printed = 0;
    while let Ok(notification) = receiver.try_recv() {
        render::print_notification(&notification);
        printed += 1;
    }
    printed
}
