//! Dictation types and the audio capture port.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::Result;

/// Kind of dictation, forwarded to the webhook as the `type` form field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RecordingType {
    Personal,
    Project,
    Provoking,
}

/// A finalized capture buffer ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

impl AudioClip {
    /// Wraps WAV-encoded bytes.
    pub fn wav(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: "recording.wav".to_string(),
            mime_type: "audio/wav".to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Microphone capture.
///
/// `start` fails with `PostcraftError::Permission` when access is denied or no
/// input device exists. `stop` finalizes everything captured since `start`.
pub trait AudioRecorder: Send {
    fn start(&mut self) -> Result<()>;

    fn stop(&mut self) -> Result<AudioClip>;

    /// Drops the capture without producing a clip.
    fn cancel(&mut self);

    fn is_recording(&self) -> bool;
}
