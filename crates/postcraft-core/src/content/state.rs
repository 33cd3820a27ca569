//! Content state as an explicit tagged union.

use std::fmt;

use super::action::ContentAction;
use super::model::ContentRecord;
use crate::error::PostcraftError;
use crate::recording::RecordingType;

/// Which control triggered the in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InFlight {
    Content(ContentAction),
    ImageUpload,
    Transcription(RecordingType),
}

impl fmt::Display for InFlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content(action) => write!(f, "{action}"),
            Self::ImageUpload => write!(f, "upload_image"),
            Self::Transcription(kind) => write!(f, "transcribe_{kind}"),
        }
    }
}

impl From<ContentAction> for InFlight {
    fn from(action: ContentAction) -> Self {
        Self::Content(action)
    }
}

/// Status of the content flow.
///
/// The last applied record travels with `Loading` and `Failed` so the preview
/// stays available while a request is pending or after it failed.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ContentState {
    #[default]
    Idle,
    Loading {
        action: InFlight,
        previous: Option<ContentRecord>,
    },
    Loaded(ContentRecord),
    Failed {
        action: InFlight,
        error: PostcraftError,
        previous: Option<ContentRecord>,
    },
}

impl ContentState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn loading_action(&self) -> Option<InFlight> {
        match self {
            Self::Loading { action, .. } => Some(*action),
            _ => None,
        }
    }

    /// The most recently applied record, whatever the current status.
    pub fn record(&self) -> Option<&ContentRecord> {
        match self {
            Self::Idle => None,
            Self::Loaded(record) => Some(record),
            Self::Loading { previous, .. } | Self::Failed { previous, .. } => previous.as_ref(),
        }
    }

    pub fn error(&self) -> Option<&PostcraftError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Idle => "idle".to_string(),
            Self::Loading { action, .. } => format!("loading ({action})"),
            Self::Loaded(_) => "loaded".to_string(),
            Self::Failed { action, .. } => format!("failed ({action})"),
        }
    }
}
