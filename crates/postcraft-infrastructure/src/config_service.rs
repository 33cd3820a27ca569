//! Configuration service implementation.
//!
//! Loads `config.toml`, applies environment overrides, writes the initial
//! template for `postcraft config init` and edits single keys for
//! `postcraft config set`.

use crate::paths::PostcraftPaths;
use crate::storage::AtomicTomlFile;
use postcraft_core::config::PostcraftConfig;
use postcraft_core::error::{PostcraftError, Result};
use std::path::{Path, PathBuf};

pub const ENV_CONTENT_WEBHOOK_URL: &str = "POSTCRAFT_CONTENT_WEBHOOK_URL";
pub const ENV_CALENDAR_WEBHOOK_URL: &str = "POSTCRAFT_CALENDAR_WEBHOOK_URL";

const CONFIG_TEMPLATE: &str = r#"# Postcraft configuration

[webhook]
# Endpoint for generation, image upload and audio transcription.
# content_url = "https://hook.example.com/content"
# Endpoint for the content calendar.
# calendar_url = "https://hook.example.com/calendar"
timeout_secs = 60

[document_store]
# Used only by `postcraft probe`.
# project_id = "my-project"
# api_key = ""
collection = "generatedContent"
base_url = "https://firestore.googleapis.com/v1"

[session]
# cache_file = "/path/to/session.json"
"#;

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn from_paths(paths: &PostcraftPaths) -> Self {
        Self::new(paths.config_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Effective configuration: file contents, then environment overrides.
    pub fn load(&self) -> Result<PostcraftConfig> {
        let mut config = self.load_file()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    /// File contents only. A missing file yields the defaults.
    pub fn load_file(&self) -> Result<PostcraftConfig> {
        let file = AtomicTomlFile::<PostcraftConfig>::new(self.path.clone());
        let config = file.load().map_err(|e| {
            PostcraftError::config(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        if config.is_none() {
            tracing::debug!(path = %self.path.display(), "No config file, using defaults");
        }
        Ok(config.unwrap_or_default())
    }

    /// Writes the commented template. Refuses to overwrite unless `force`.
    pub fn init(&self, force: bool) -> Result<&Path> {
        if self.path.exists() && !force {
            return Err(PostcraftError::config(format!(
                "{} already exists (use --force to overwrite)",
                self.path.display()
            )));
        }
        AtomicTomlFile::<PostcraftConfig>::new(self.path.clone()).write_raw(CONFIG_TEMPLATE)?;
        tracing::info!(path = %self.path.display(), "Wrote config template");
        Ok(&self.path)
    }

    /// Updates one key in the file under an exclusive lock and returns the
    /// stored configuration. Comments in the file are not preserved.
    pub fn set(&self, key: &str, value: &str) -> Result<PostcraftConfig> {
        let file = AtomicTomlFile::<PostcraftConfig>::new(self.path.clone());
        file.update(PostcraftConfig::default(), |config| config.set_value(key, value))?;
        tracing::info!(path = %self.path.display(), key, "Updated config value");
        self.load_file()
    }
}

/// Applies `POSTCRAFT_*` overrides. Empty values are ignored.
pub fn apply_env_overrides(config: &mut PostcraftConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(url) = get(ENV_CONTENT_WEBHOOK_URL) {
        config.webhook.content_url = Some(url);
    }
    if let Some(url) = get(ENV_CALENDAR_WEBHOOK_URL) {
        config.webhook.calendar_url = Some(url);
    }
}

/// Renders the configuration as TOML for display.
pub fn render_config(config: &PostcraftConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}
