//! Application layer for Postcraft.
//!
//! Use cases that drive the core state machines around the webhook gateway,
//! the session cache and the audio recorder.

pub mod calendar_sync;
pub mod content_session;
pub mod notifier;
pub mod recording_session;

#[cfg(test)]
mod testing;

pub use calendar_sync::CalendarSynchronizer;
pub use content_session::ContentSession;
pub use notifier::{ChannelNotifier, TracingNotifier};
pub use recording_session::{RecordingPhase, RecordingSession};
