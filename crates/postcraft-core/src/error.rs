//! Error types for the Postcraft application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Postcraft application.
///
/// The first six variants are the failure taxonomy of the webhook flows. Their
/// `Display` output is the message shown to the user, so keep it readable.
/// The remaining variants cover local concerns (files, configuration, input).
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PostcraftError {
    /// No response reached the client (connect failure, timeout, reset).
    #[error("No response received from the server. Please check your network connection.")]
    Network { detail: String },

    /// The server answered with a non-success HTTP status.
    #[error("Server error: {status} {reason}")]
    Server { status: u16, reason: String },

    /// The response did not match any recognized shape after unwrapping.
    #[error("Unexpected response format from server: {0}")]
    ResponseFormat(String),

    /// The file was rejected before upload, or the upload response lacked an image URL.
    #[error("Image upload failed: {0}")]
    Upload(String),

    /// Microphone access was denied or no capture device is available.
    #[error("Failed to start recording. Please check your microphone permissions. ({0})")]
    Permission(String),

    /// The calendar list could not be fetched and no data was recoverable.
    #[error("Failed to fetch calendar data: {0}")]
    CalendarFetch(String),

    /// A trigger was fired while another request is still in flight.
    #[error("Another request is still in progress ({action})")]
    Busy { action: String },

    /// User input was rejected before any request was made.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Reading or writing a local file failed.
    #[error("IO error: {message}")]
    Io { message: String },

    /// A local JSON or TOML document could not be encoded or decoded.
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Missing or invalid settings, such as an unset webhook URL.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A broken invariant inside postcraft itself.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PostcraftError {
    // Constructors

    pub fn network(detail: impl Into<String>) -> Self {
        Self::Network {
            detail: detail.into(),
        }
    }

    pub fn server(status: u16, reason: impl Into<String>) -> Self {
        Self::Server {
            status,
            reason: reason.into(),
        }
    }

    pub fn response_format(message: impl Into<String>) -> Self {
        Self::ResponseFormat(message.into())
    }

    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload(message.into())
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission(message.into())
    }

    pub fn calendar_fetch(message: impl Into<String>) -> Self {
        Self::CalendarFetch(message.into())
    }

    pub fn busy(action: impl Into<String>) -> Self {
        Self::Busy {
            action: action.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // Kind checks

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    pub fn is_server(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    pub fn is_response_format(&self) -> bool {
        matches!(self, Self::ResponseFormat(_))
    }

    pub fn is_upload(&self) -> bool {
        matches!(self, Self::Upload(_))
    }

    pub fn is_permission(&self) -> bool {
        matches!(self, Self::Permission(_))
    }

    pub fn is_calendar_fetch(&self) -> bool {
        matches!(self, Self::CalendarFetch(_))
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }

    /// HTTP status carried by a `Server` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PostcraftError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PostcraftError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PostcraftError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PostcraftError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, PostcraftError>`.
pub type Result<T> = std::result::Result<T, PostcraftError>;
