//! In-process doubles for the core ports, shared by the unit tests.

use async_trait::async_trait;
use postcraft_core::calendar::{CalendarMutation, ScheduledPost};
use postcraft_core::content::{ContentRecord, GenerateRequest};
use postcraft_core::error::{PostcraftError, Result};
use postcraft_core::gateway::{ImageUpload, WebhookGateway};
use postcraft_core::notification::{Notification, Notifier};
use postcraft_core::recording::{AudioClip, AudioRecorder, RecordingType};
use postcraft_core::session_cache::SessionCache;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

fn unscripted<T>(call: &str) -> Result<T> {
    Err(PostcraftError::internal(format!("unscripted call: {call}")))
}

/// Gateway returning queued results in order.
#[derive(Default)]
pub struct MockGateway {
    pub generate_results: Mutex<VecDeque<Result<ContentRecord>>>,
    pub upload_results: Mutex<VecDeque<Result<String>>>,
    pub calendar_results: Mutex<VecDeque<Result<Vec<ScheduledPost>>>>,
    pub mutate_results: Mutex<VecDeque<Result<Option<Vec<ScheduledPost>>>>>,
    pub transcribe_results: Mutex<VecDeque<Result<ContentRecord>>>,
    pub requests: Mutex<Vec<GenerateRequest>>,
    pub mutations: Mutex<Vec<CalendarMutation>>,
    pub uploads: AtomicUsize,
    pub transcriptions: Mutex<Vec<RecordingType>>,
    /// When set, `mutate_calendar` signals `entered` and waits for `release`.
    pub mutation_gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mutation_gate(mut self) -> (Self, Arc<Notify>, Arc<Notify>) {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        self.mutation_gate = Some((entered.clone(), release.clone()));
        (self, entered, release)
    }

    pub fn push_generate(&self, result: Result<ContentRecord>) {
        self.generate_results.lock().unwrap().push_back(result);
    }

    pub fn push_upload(&self, result: Result<String>) {
        self.upload_results.lock().unwrap().push_back(result);
    }

    pub fn push_calendar(&self, result: Result<Vec<ScheduledPost>>) {
        self.calendar_results.lock().unwrap().push_back(result);
    }

    pub fn push_mutate(&self, result: Result<Option<Vec<ScheduledPost>>>) {
        self.mutate_results.lock().unwrap().push_back(result);
    }

    pub fn push_transcribe(&self, result: Result<ContentRecord>) {
        self.transcribe_results.lock().unwrap().push_back(result);
    }

    pub fn calendar_calls_left(&self) -> usize {
        self.calendar_results.lock().unwrap().len()
    }
}

#[async_trait]
impl WebhookGateway for MockGateway {
    async fn generate(&self, request: &GenerateRequest) -> Result<ContentRecord> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.generate_results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| unscripted("generate"))
    }

    async fn upload_image(&self, image: &ImageUpload) -> Result<String> {
        image.ensure_within_limit()?;
        self.uploads.fetch_add(1, Ordering::SeqCst);
        let next = self.upload_results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| unscripted("upload_image"))
    }

    async fn get_calendar(&self) -> Result<Vec<ScheduledPost>> {
        let next = self.calendar_results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| unscripted("get_calendar"))
    }

    async fn mutate_calendar(
        &self,
        mutation: &CalendarMutation,
    ) -> Result<Option<Vec<ScheduledPost>>> {
        self.mutations.lock().unwrap().push(mutation.clone());
        if let Some((entered, release)) = &self.mutation_gate {
            entered.notify_one();
            release.notified().await;
        }
        let next = self.mutate_results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| unscripted("mutate_calendar"))
    }

    async fn transcribe(&self, _clip: &AudioClip, kind: RecordingType) -> Result<ContentRecord> {
        self.transcriptions.lock().unwrap().push(kind);
        let next = self.transcribe_results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| unscripted("transcribe"))
    }
}

/// Session cache held in memory.
#[derive(Default)]
pub struct MemoryCache {
    pub slot: Mutex<Option<ContentRecord>>,
}

#[async_trait]
impl SessionCache for MemoryCache {
    async fn load(&self) -> Result<Option<ContentRecord>> {
        Ok(self.slot.lock().unwrap().clone())
    }

    async fn store(&self, record: &ContentRecord) -> Result<()> {
        *self.slot.lock().unwrap() = Some(record.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}

/// Notifier that keeps everything it receives.
#[derive(Default)]
pub struct CollectingNotifier {
    pub received: Mutex<Vec<Notification>>,
}

impl CollectingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.is_error())
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        self.received.lock().unwrap().push(notification);
    }
}

/// Recorder that never touches audio hardware.
pub struct ScriptedRecorder {
    pub deny_start: bool,
    pub recording: bool,
    pub starts: Arc<AtomicUsize>,
    pub cancels: Arc<AtomicUsize>,
}

impl ScriptedRecorder {
    pub fn new() -> Self {
        Self {
            deny_start: false,
            recording: false,
            starts: Arc::new(AtomicUsize::new(0)),
            cancels: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn denied() -> Self {
        Self {
            deny_start: true,
            ..Self::new()
        }
    }
}

impl AudioRecorder for ScriptedRecorder {
    fn start(&mut self) -> Result<()> {
        if self.deny_start {
            return Err(PostcraftError::permission("denied"));
        }
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.recording = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<AudioClip> {
        self.recording = false;
        Ok(AudioClip::wav(vec![0; 32]))
    }

    fn cancel(&mut self) {
        self.recording = false;
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }

    fn is_recording(&self) -> bool {
        self.recording
    }
}
