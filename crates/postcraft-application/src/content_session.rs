//! Content session use case.
//!
//! `ContentSession` drives the `ContentMachine` around webhook calls: it moves
//! the machine into `Loading`, releases the lock for the network round trip,
//! applies the outcome, writes the session cache and notifies the user.

use chrono::{Local, NaiveDate};
use postcraft_core::calendar::validate_schedule_date;
use postcraft_core::content::{
    ContentAction, ContentMachine, ContentRecord, ContentState, FormField, InFlight,
    RegenerateOptions, RequestTicket, Routed,
};
use postcraft_core::error::{PostcraftError, Result};
use postcraft_core::gateway::{ImageUpload, WebhookGateway};
use postcraft_core::notification::{Notification, Notifier};
use postcraft_core::recording::{AudioClip, RecordingType};
use postcraft_core::session_cache::SessionCache;
use std::sync::Arc;
use tokio::sync::RwLock;

const IMAGE_UPLOADED: &str = "Image uploaded successfully!";
const IMAGE_UPLOAD_FAILED: &str = "Failed to upload image. Please try again.";
const IMAGE_TOO_LARGE: &str = "File size exceeds 10MB limit. Please choose a smaller file.";
const AUDIO_PROCESSED: &str = "Audio transcribed and processed successfully!";
const AUDIO_FAILED: &str = "Failed to process audio. Please try again.";

pub struct ContentSession {
    machine: Arc<RwLock<ContentMachine>>,
    gateway: Arc<dyn WebhookGateway>,
    cache: Arc<dyn SessionCache>,
    notifier: Arc<dyn Notifier>,
}

impl ContentSession {
    pub fn new(
        gateway: Arc<dyn WebhookGateway>,
        cache: Arc<dyn SessionCache>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            machine: Arc::new(RwLock::new(ContentMachine::new())),
            gateway,
            cache,
            notifier,
        }
    }

    /// Rehydrates from the session cache. Returns whether a record was restored.
    ///
    /// A failing cache is logged and treated as empty.
    pub async fn restore(&self) -> bool {
        let record = match self.cache.load().await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Failed to read session cache: {}", e);
                None
            }
        };
        let restored = record.is_some();
        *self.machine.write().await = ContentMachine::rehydrated(record);
        if restored {
            tracing::info!("Restored previous content from session cache");
        }
        restored
    }

    // ============================================================================
    // Read access
    // ============================================================================

    /// A copy of the whole machine for rendering.
    pub async fn snapshot(&self) -> ContentMachine {
        self.machine.read().await.clone()
    }

    pub async fn state(&self) -> ContentState {
        self.machine.read().await.state().clone()
    }

    pub async fn copy_text(&self) -> String {
        self.machine.read().await.copy_text()
    }

    // ============================================================================
    // Direct input
    // ============================================================================

    pub async fn set_field(&self, field: FormField, value: impl Into<String>) {
        self.machine.write().await.set_field(field, value);
    }

    pub async fn set_draft(&self, draft: impl Into<String>) {
        self.machine.write().await.set_draft(draft);
    }

    pub async fn set_scheduled_date(&self, date: Option<NaiveDate>) {
        self.machine.write().await.set_scheduled_date(date);
    }

    pub async fn set_regenerate_options(&self, options: RegenerateOptions) {
        self.machine.write().await.set_regenerate_options(options);
    }

    // ============================================================================
    // Webhook-backed actions
    // ============================================================================

    /// Runs a generation-family action end to end.
    pub async fn run(&self, action: ContentAction) -> Result<Routed> {
        let (ticket, request) = {
            let mut machine = self.machine.write().await;
            if action == ContentAction::AddItem {
                let date = machine.scheduled_date().ok_or_else(|| {
                    PostcraftError::validation("Select a date before scheduling the post")
                });
                if let Err(e) = date.and_then(|d| validate_schedule_date(d, today())) {
                    self.notify_error(&e);
                    return Err(e);
                }
            }
            let ticket = self.begin(&mut machine, action)?;
            (ticket, machine.request_for(action))
        };

        tracing::info!(action = %action, "Running content action");
        match self.gateway.generate(&request).await {
            Ok(record) => {
                let routed = self.machine.write().await.complete(ticket, record.clone());
                self.persist(&record).await;
                if let Some(notice) = action.success_notice() {
                    self.notifier.notify(Notification::success(notice));
                }
                tracing::info!(action = %action, ?routed, "Content action completed");
                Ok(routed)
            }
            Err(e) => {
                tracing::warn!(action = %action, "Content action failed: {}", e);
                self.machine.write().await.fail(ticket, e.clone());
                self.notify_error(&e);
                Err(e)
            }
        }
    }

    /// Uploads an image and attaches its URL to the current content.
    pub async fn upload_image(&self, image: ImageUpload) -> Result<String> {
        if let Err(e) = image.ensure_within_limit() {
            self.notifier.notify(Notification::error(IMAGE_TOO_LARGE));
            return Err(e);
        }

        let ticket = {
            let mut machine = self.machine.write().await;
            self.begin(&mut machine, InFlight::ImageUpload)?
        };

        match self.gateway.upload_image(&image).await {
            Ok(url) => {
                self.machine
                    .write()
                    .await
                    .complete_upload(ticket, url.clone());
                self.notifier.notify(Notification::success(IMAGE_UPLOADED));
                tracing::info!(url = %url, "Image uploaded");
                Ok(url)
            }
            Err(e) => {
                tracing::warn!("Image upload failed: {}", e);
                self.machine.write().await.fail(ticket, e.clone());
                self.notifier.notify(Notification::error(IMAGE_UPLOAD_FAILED));
                Err(e)
            }
        }
    }

    /// Sends recorded audio for transcription and applies the result like a
    /// generation response.
    pub async fn apply_transcription(&self, kind: RecordingType, clip: AudioClip) -> Result<Routed> {
        let ticket = {
            let mut machine = self.machine.write().await;
            self.begin(&mut machine, InFlight::Transcription(kind))?
        };

        match self.gateway.transcribe(&clip, kind).await {
            Ok(record) => {
                let routed = self.machine.write().await.complete(ticket, record.clone());
                self.persist(&record).await;
                self.notifier.notify(Notification::success(AUDIO_PROCESSED));
                Ok(routed)
            }
            Err(e) => {
                tracing::warn!(kind = %kind, "Transcription failed: {}", e);
                self.machine.write().await.fail(ticket, e.clone());
                self.notifier.notify(Notification::error(AUDIO_FAILED));
                Err(e)
            }
        }
    }

    /// Clears every field and the session cache.
    pub async fn reset(&self) -> Result<()> {
        self.machine.write().await.reset();
        self.cache.clear().await.inspect_err(|e| {
            tracing::warn!("Failed to clear session cache: {}", e);
            self.notify_error(e);
        })?;
        tracing::info!("Content session reset");
        Ok(())
    }

    fn begin(
        &self,
        machine: &mut ContentMachine,
        action: impl Into<InFlight>,
    ) -> Result<RequestTicket> {
        machine.begin(action).inspect_err(|e| self.notify_error(e))
    }

    async fn persist(&self, record: &ContentRecord) {
        if let Err(e) = self.cache.store(record).await {
            tracing::warn!("Failed to write session cache: {}", e);
        }
    }

    fn notify_error(&self, error: &PostcraftError) {
        self.notifier.notify(Notification::error(error.to_string()));
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
