//! Port for the content and scheduling webhooks.

use async_trait::async_trait;

use crate::calendar::{CalendarMutation, ScheduledPost};
use crate::content::{ContentRecord, GenerateRequest};
use crate::error::{PostcraftError, Result};
use crate::recording::{AudioClip, RecordingType};

/// Largest image accepted for upload.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// An image picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Rejects files over `MAX_IMAGE_BYTES`. Run before any network call.
    pub fn ensure_within_limit(&self) -> Result<()> {
        if self.size() > MAX_IMAGE_BYTES {
            return Err(PostcraftError::upload(format!(
                "File size ({:.1} MB) exceeds the 10MB limit",
                self.size() as f64 / (1024.0 * 1024.0)
            )));
        }
        Ok(())
    }
}

/// Every outbound call of the app. Calls are single-shot and never retried.
#[async_trait]
pub trait WebhookGateway: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<ContentRecord>;

    /// Returns the hosted image URL.
    async fn upload_image(&self, image: &ImageUpload) -> Result<String>;

    /// Sorted posts. A failed read whose body still carries a post list is
    /// recovered; otherwise `PostcraftError::CalendarFetch`.
    async fn get_calendar(&self) -> Result<Vec<ScheduledPost>>;

    /// `Some` when the endpoint answered with an updated post list.
    async fn mutate_calendar(
        &self,
        mutation: &CalendarMutation,
    ) -> Result<Option<Vec<ScheduledPost>>>;

    async fn transcribe(&self, clip: &AudioClip, kind: RecordingType) -> Result<ContentRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_limit() {
        let small = ImageUpload::new("a.png", "image/png", vec![0; 1024]);
        assert!(small.ensure_within_limit().is_ok());

        let exact = ImageUpload::new("b.png", "image/png", vec![0; MAX_IMAGE_BYTES]);
        assert!(exact.ensure_within_limit().is_ok());

        let large = ImageUpload::new("c.png", "image/png", vec![0; 11_000_000]);
        let err = large.ensure_within_limit().unwrap_err();
        assert!(err.is_upload());
        assert!(err.to_string().contains("10MB"));
    }
}
