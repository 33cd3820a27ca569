//! Read/write permission check against the document store.
//!
//! Not part of any content flow. The probe lists one document of the
//! configured collection and writes a `{test: true}` document, then reports
//! what was allowed. Failures are reported, never raised.

use postcraft_core::config::DocumentStoreConfig;
use postcraft_core::error::{PostcraftError, Result};
use reqwest::Client;
use serde_json::json;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Allowed,
    Denied { status: u16, message: String },
    Unreachable(String),
}

impl ProbeOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed => write!(f, "allowed"),
            Self::Denied { status, message } => write!(f, "denied ({status}): {message}"),
            Self::Unreachable(detail) => write!(f, "unreachable: {detail}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub collection: String,
    pub read: ProbeOutcome,
    pub write: ProbeOutcome,
}

pub struct DocumentStoreProbe {
    client: Client,
    collection_url: String,
    collection: String,
    api_key: Option<String>,
}

impl DocumentStoreProbe {
    pub fn from_config(config: &DocumentStoreConfig, timeout: Duration) -> Result<Self> {
        let project_id = config.require_project_id()?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PostcraftError::internal(format!("Failed to build HTTP client: {e}")))?;
        let collection_url = format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            config.base_url.trim_end_matches('/'),
            project_id,
            config.collection
        );
        Ok(Self {
            client,
            collection_url,
            collection: config.collection.clone(),
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
        })
    }

    pub async fn run(&self) -> ProbeReport {
        let read = self.check_read().await;
        match &read {
            ProbeOutcome::Allowed => tracing::info!(collection = %self.collection, "Read permission OK"),
            other => tracing::warn!(collection = %self.collection, "Read check failed: {}", other),
        }

        let write = self.check_write().await;
        match &write {
            ProbeOutcome::Allowed => tracing::info!(collection = %self.collection, "Write permission OK"),
            other => tracing::warn!(collection = %self.collection, "Write check failed: {}", other),
        }

        ProbeReport {
            collection: self.collection.clone(),
            read,
            write,
        }
    }

    async fn check_read(&self) -> ProbeOutcome {
        let mut request = self
            .client
            .get(&self.collection_url)
            .query(&[("pageSize", "1")]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }
        Self::outcome(request.send().await).await
    }

    async fn check_write(&self) -> ProbeOutcome {
        let mut request = self
            .client
            .post(&self.collection_url)
            .json(&json!({"fields": {"test": {"booleanValue": true}}}));
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }
        Self::outcome(request.send().await).await
    }

    async fn outcome(result: reqwest::Result<reqwest::Response>) -> ProbeOutcome {
        match result {
            Ok(response) if response.status().is_success() => ProbeOutcome::Allowed,
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<serde_json::Value>(&body)
                    .ok()
                    .and_then(|value| {
                        value
                            .pointer("/error/message")
                            .and_then(|m| m.as_str())
                            .map(str::to_string)
                    })
                    .unwrap_or(body);
                ProbeOutcome::Denied { status, message }
            }
            Err(err) => ProbeOutcome::Unreachable(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: String) -> DocumentStoreConfig {
        DocumentStoreConfig {
            project_id: Some("demo".into()),
            api_key: Some("k".into()),
            base_url,
            ..DocumentStoreConfig::default()
        }
    }

    #[tokio::test]
    async fn test_probe_reports_read_and_write() {
        let mut server = mockito::Server::new_async().await;
        let path = "/projects/demo/databases/(default)/documents/generatedContent";
        let read = server
            .mock("GET", path)
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("pageSize".into(), "1".into()),
                mockito::Matcher::UrlEncoded("key".into(), "k".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"documents": []}"#)
            .create_async()
            .await;
        let write = server
            .mock("POST", path)
            .match_query(mockito::Matcher::Any)
            .match_body(mockito::Matcher::PartialJson(
                json!({"fields": {"test": {"booleanValue": true}}}),
            ))
            .with_status(403)
            .with_body(r#"{"error": {"message": "Missing or insufficient permissions."}}"#)
            .create_async()
            .await;

        let probe = DocumentStoreProbe::from_config(&config(server.url()), Duration::from_secs(5))
            .unwrap();
        let report = probe.run().await;

        assert!(report.read.is_allowed());
        assert_eq!(
            report.write,
            ProbeOutcome::Denied {
                status: 403,
                message: "Missing or insufficient permissions.".into()
            }
        );
        read.assert_async().await;
        write.assert_async().await;
    }

    #[test]
    fn test_probe_requires_project_id() {
        let result = DocumentStoreProbe::from_config(
            &DocumentStoreConfig::default(),
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(PostcraftError::Config(_))));
    }
}
