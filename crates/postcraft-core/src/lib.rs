//! Domain models, pure transforms and ports for Postcraft.
//!
//! Nothing in this crate performs I/O. The webhook client, storage and audio
//! capture live behind the traits in [`gateway`], [`session_cache`],
//! [`notification`] and [`recording`].

pub mod calendar;
pub mod config;
pub mod content;
pub mod error;
pub mod gateway;
pub mod notification;
pub mod optimistic;
pub mod recording;
pub mod session_cache;

// Re-export common error type
pub use error::{PostcraftError, Result};
