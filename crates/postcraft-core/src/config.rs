//! Configuration models (`config.toml`).

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PostcraftError, Result};

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_COLLECTION: &str = "generatedContent";
pub const DEFAULT_DOCUMENT_STORE_URL: &str = "https://firestore.googleapis.com/v1";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct PostcraftConfig {
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub document_store: DocumentStoreConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct WebhookConfig {
    /// Generation, image upload and transcription endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    /// Scheduling endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            content_url: None,
            calendar_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl WebhookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn require_content_url(&self) -> Result<&str> {
        required(self.content_url.as_deref(), "webhook.content_url")
    }

    pub fn require_calendar_url(&self) -> Result<&str> {
        required(self.calendar_url.as_deref(), "webhook.calendar_url")
    }
}

/// Document store used only for the permission probe.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DocumentStoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_document_store_url")]
    pub base_url: String,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_document_store_url() -> String {
    DEFAULT_DOCUMENT_STORE_URL.to_string()
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            api_key: None,
            collection: default_collection(),
            base_url: default_document_store_url(),
        }
    }
}

impl DocumentStoreConfig {
    pub fn require_project_id(&self) -> Result<&str> {
        required(self.project_id.as_deref(), "document_store.project_id")
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct SessionConfig {
    /// Overrides the default session cache location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<PathBuf>,
}

/// Keys accepted by `PostcraftConfig::set_value`.
pub const SETTABLE_KEYS: &[&str] = &[
    "webhook.content_url",
    "webhook.calendar_url",
    "webhook.timeout_secs",
    "document_store.project_id",
    "document_store.api_key",
    "document_store.collection",
    "document_store.base_url",
    "session.cache_file",
];

impl PostcraftConfig {
    /// Sets one dotted key. An empty value unsets optional keys.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let optional = || Some(value.to_string()).filter(|v| !v.is_empty());
        match key {
            "webhook.content_url" => self.webhook.content_url = optional(),
            "webhook.calendar_url" => self.webhook.calendar_url = optional(),
            "webhook.timeout_secs" => {
                self.webhook.timeout_secs = value
                    .parse()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| {
                        PostcraftError::config(format!(
                            "webhook.timeout_secs must be a positive integer, got '{value}'"
                        ))
                    })?;
            }
            "document_store.project_id" => self.document_store.project_id = optional(),
            "document_store.api_key" => self.document_store.api_key = optional(),
            "document_store.collection" => {
                self.document_store.collection = optional().unwrap_or_else(default_collection)
            }
            "document_store.base_url" => {
                self.document_store.base_url =
                    optional().unwrap_or_else(default_document_store_url)
            }
            "session.cache_file" => self.session.cache_file = optional().map(PathBuf::from),
            _ => {
                return Err(PostcraftError::config(format!(
                    "Unknown configuration key: {key} (expected one of {})",
                    SETTABLE_KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

fn required<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| PostcraftError::config(format!("Missing configuration value: {key}")))
}
