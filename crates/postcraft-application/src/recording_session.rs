//! Dictation use case.
//!
//! One recorder is shared by the three dictation controls. Starting a second
//! kind while one is active stops and flushes the active capture first.

use crate::content_session::ContentSession;
use postcraft_core::content::Routed;
use postcraft_core::error::{PostcraftError, Result};
use postcraft_core::notification::{Notification, Notifier};
use postcraft_core::recording::{AudioRecorder, RecordingType};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

const START_FAILED: &str = "Failed to start recording. Please check your microphone permissions.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingPhase {
    #[default]
    Idle,
    Recording(RecordingType),
    /// Capture stopped, transcription in flight.
    Flushing(RecordingType),
}

impl RecordingPhase {
    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording(_))
    }
}

impl fmt::Display for RecordingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Recording(kind) => write!(f, "recording {kind}"),
            Self::Flushing(kind) => write!(f, "transcribing {kind}"),
        }
    }
}

pub struct RecordingSession {
    recorder: Mutex<Box<dyn AudioRecorder>>,
    phase: RwLock<RecordingPhase>,
    content: Arc<ContentSession>,
    notifier: Arc<dyn Notifier>,
}

impl RecordingSession {
    pub fn new(
        recorder: Box<dyn AudioRecorder>,
        content: Arc<ContentSession>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            recorder: Mutex::new(recorder),
            phase: RwLock::new(RecordingPhase::Idle),
            content,
            notifier,
        }
    }

    pub async fn phase(&self) -> RecordingPhase {
        *self.phase.read().await
    }

    /// Begins capturing for `kind`, flushing any other active capture first.
    pub async fn start(&self, kind: RecordingType) -> Result<()> {
        match self.phase().await {
            RecordingPhase::Flushing(active) => {
                return Err(PostcraftError::busy(format!("transcribe_{active}")));
            }
            RecordingPhase::Recording(active) if active == kind => return Ok(()),
            RecordingPhase::Recording(active) => {
                tracing::info!(from = %active, to = %kind, "Switching dictation type");
                if let Err(e) = self.stop().await {
                    tracing::warn!(kind = %active, "Flushing previous recording failed: {}", e);
                }
            }
            RecordingPhase::Idle => {}
        }

        let mut recorder = self.recorder.lock().await;
        if let Err(e) = recorder.start() {
            tracing::warn!(kind = %kind, "Recording start failed: {}", e);
            *self.phase.write().await = RecordingPhase::Idle;
            self.notifier.notify(Notification::error(START_FAILED));
            return Err(e);
        }
        *self.phase.write().await = RecordingPhase::Recording(kind);
        tracing::info!(kind = %kind, "Recording started");
        Ok(())
    }

    /// Stops the active capture and sends it for transcription.
    ///
    /// Returns `Ok(None)` when nothing was recording.
    pub async fn stop(&self) -> Result<Option<Routed>> {
        let kind = {
            let mut phase = self.phase.write().await;
            let RecordingPhase::Recording(kind) = *phase else {
                return Ok(None);
            };
            *phase = RecordingPhase::Flushing(kind);
            kind
        };

        let clip = self.recorder.lock().await.stop();
        let outcome = match clip {
            Ok(clip) => self.content.apply_transcription(kind, clip).await.map(Some),
            Err(e) => {
                tracing::warn!(kind = %kind, "Recording stop failed: {}", e);
                self.notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        };

        *self.phase.write().await = RecordingPhase::Idle;
        outcome
    }

    /// Same kind stops; another kind switches.
    pub async fn toggle(&self, kind: RecordingType) -> Result<Option<Routed>> {
        match self.phase().await {
            RecordingPhase::Recording(active) if active == kind => self.stop().await,
            _ => self.start(kind).await.map(|_| None),
        }
    }

    /// Drops the active capture without transcribing.
    pub async fn cancel(&self) {
        let mut recorder = self.recorder.lock().await;
        let mut phase = self.phase.write().await;
        if phase.is_recording() {
            recorder.cancel();
            *phase = RecordingPhase::Idle;
            tracing::info!("Recording cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CollectingNotifier, MemoryCache, MockGateway, ScriptedRecorder};
    use postcraft_core::content::ContentRecord;
    use std::sync::atomic::Ordering;

    struct Fixture {
        session: RecordingSession,
        gateway: Arc<MockGateway>,
        notifier: Arc<CollectingNotifier>,
    }

    fn fixture(recorder: ScriptedRecorder) -> Fixture {
        let gateway = Arc::new(MockGateway::new());
        let notifier = Arc::new(CollectingNotifier::default());
        let content = Arc::new(ContentSession::new(
            gateway.clone(),
            Arc::new(MemoryCache::default()),
            notifier.clone(),
        ));
        let session = RecordingSession::new(Box::new(recorder), content, notifier.clone());
        Fixture {
            session,
            gateway,
            notifier,
        }
    }

    #[tokio::test]
    async fn test_toggle_records_then_transcribes() {
        let f = fixture(ScriptedRecorder::new());
        f.gateway
            .push_transcribe(Ok(ContentRecord::new("dictated", false)));

        assert!(f.session.toggle(RecordingType::Personal).await.unwrap().is_none());
        assert_eq!(
            f.session.phase().await,
            RecordingPhase::Recording(RecordingType::Personal)
        );

        let routed = f.session.toggle(RecordingType::Personal).await.unwrap();
        assert_eq!(routed, Some(Routed::Draft));
        assert_eq!(f.session.phase().await, RecordingPhase::Idle);
        assert_eq!(
            *f.gateway.transcriptions.lock().unwrap(),
            vec![RecordingType::Personal]
        );
    }

    #[tokio::test]
    async fn test_switching_type_flushes_active_recording() {
        let recorder = ScriptedRecorder::new();
        let starts = recorder.starts.clone();
        let f = fixture(recorder);
        f.gateway
            .push_transcribe(Ok(ContentRecord::new("project notes", false)));

        f.session.start(RecordingType::Project).await.unwrap();
        f.session.toggle(RecordingType::Provoking).await.unwrap();

        assert_eq!(starts.load(Ordering::SeqCst), 2);
        assert_eq!(
            *f.gateway.transcriptions.lock().unwrap(),
            vec![RecordingType::Project]
        );
        assert_eq!(
            f.session.phase().await,
            RecordingPhase::Recording(RecordingType::Provoking)
        );
    }

    #[tokio::test]
    async fn test_denied_microphone_stays_idle() {
        let f = fixture(ScriptedRecorder::denied());

        let err = f.session.start(RecordingType::Personal).await.unwrap_err();
        assert!(err.is_permission());
        assert_eq!(f.session.phase().await, RecordingPhase::Idle);
        assert_eq!(f.notifier.errors(), vec![START_FAILED]);
    }

    #[tokio::test]
    async fn test_failed_transcription_returns_to_idle() {
        let f = fixture(ScriptedRecorder::new());
        f.gateway
            .push_transcribe(Err(PostcraftError::server(500, "Internal Server Error")));

        f.session.start(RecordingType::Personal).await.unwrap();
        assert!(f.session.stop().await.unwrap_err().is_server());
        assert_eq!(f.session.phase().await, RecordingPhase::Idle);
        assert_eq!(
            f.notifier.errors(),
            vec!["Failed to process audio. Please try again."]
        );
    }

    #[tokio::test]
    async fn test_cancel_skips_transcription() {
        let recorder = ScriptedRecorder::new();
        let cancels = recorder.cancels.clone();
        let f = fixture(recorder);

        f.session.start(RecordingType::Project).await.unwrap();
        f.session.cancel().await;

        assert_eq!(cancels.load(Ordering::SeqCst), 1);
        assert_eq!(f.session.phase().await, RecordingPhase::Idle);
        assert!(f.session.stop().await.unwrap().is_none());
        assert!(f.gateway.transcriptions.lock().unwrap().is_empty());
    }
}
