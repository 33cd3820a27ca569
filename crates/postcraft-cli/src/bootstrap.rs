//! Composition root: resolves paths and configuration and wires the use cases.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use postcraft_application::{CalendarSynchronizer, ContentSession, RecordingSession};
use postcraft_core::config::PostcraftConfig;
use postcraft_core::notification::Notifier;
use postcraft_core::recording::AudioRecorder;
use postcraft_core::session_cache::SessionCache;
use postcraft_infrastructure::{ConfigService, FileSessionCache, PostcraftPaths};
use postcraft_interaction::HttpWebhookGateway;

pub struct AppContext {
    pub paths: PostcraftPaths,
    pub config_service: ConfigService,
    pub config: PostcraftConfig,
}

impl AppContext {
    /// Loads the effective configuration.
    pub fn load(paths: PostcraftPaths, config_path: Option<PathBuf>) -> Result<Self> {
        let config_service = config_service(&paths, config_path);
        let config = config_service.load()?;
        Ok(Self {
            paths,
            config_service,
            config,
        })
    }

    pub fn gateway(&self) -> Result<Arc<HttpWebhookGateway>> {
        Ok(Arc::new(HttpWebhookGateway::from_config(&self.config.webhook)?))
    }

    pub fn session_cache_file(&self) -> PathBuf {
        self.config
            .session
            .cache_file
            .clone()
            .unwrap_or_else(|| self.paths.session_cache_file())
    }

    pub fn content_session(&self, notifier: Arc<dyn Notifier>) -> Result<Arc<ContentSession>> {
        let cache: Arc<dyn SessionCache> = Arc::new(FileSessionCache::new(self.session_cache_file()));
        Ok(Arc::new(ContentSession::new(self.gateway()?, cache, notifier)))
    }

    pub fn calendar(&self, notifier: Arc<dyn Notifier>) -> Result<Arc<CalendarSynchronizer>> {
        Ok(Arc::new(CalendarSynchronizer::new(self.gateway()?, notifier)))
    }

    pub fn recording_session(
        &self,
        content: Arc<ContentSession>,
        notifier: Arc<dyn Notifier>,
    ) -> RecordingSession {
        RecordingSession::new(recorder(), content, notifier)
    }
}

pub fn resolve_paths() -> Result<PostcraftPaths> {
    PostcraftPaths::resolve().context("Failed to resolve application directories")
}

/// `--config` wins over the platform default location.
pub fn config_service(paths: &PostcraftPaths, config_path: Option<PathBuf>) -> ConfigService {
    match config_path {
        Some(path) => ConfigService::new(path),
        None => ConfigService::from_paths(paths),
    }
}

#[cfg(feature = "microphone")]
fn recorder() -> Box<dyn AudioRecorder> {
    Box::new(postcraft_interaction::CpalRecorder::new())
}

#[cfg(not(feature = "microphone"))]
fn recorder() -> Box<dyn AudioRecorder> {
    Box::new(NoMicrophone)
}

/// Stand-in used when the binary is built without the `microphone` feature.
#[cfg(not(feature = "microphone"))]
struct NoMicrophone;

#[cfg(not(feature = "microphone"))]
impl AudioRecorder for NoMicrophone {
    fn start(&mut self) -> postcraft_core::Result<()> {
        Err(postcraft_core::PostcraftError::permission(
            "postcraft was built without microphone support",
        ))
    }

    fn stop(&mut self) -> postcraft_core::Result<postcraft_core::recording::AudioClip> {
        Err(postcraft_core::PostcraftError::validation("No audio recorded"))
    }

    fn cancel(&mut self) {}

    fn is_recording(&self) -> bool {
        false
    }
}
