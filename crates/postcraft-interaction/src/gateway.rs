//! HttpWebhookGateway - REST client for the content and scheduling webhooks.
//!
//! Every call is a single request with no retry. Responses are normalized in
//! `postcraft-core`; this module only moves bytes and maps transport and
//! status failures into `PostcraftError`.

use async_trait::async_trait;
use postcraft_core::calendar::{
    CalendarMutation, ScheduledPost, TextEncoding, posts_from_items, sort_by_date,
};
use postcraft_core::config::WebhookConfig;
use postcraft_core::content::{
    ContentRecord, DecodeMode, GenerateRequest, decode_content_response, unwrap_response_object,
};
use postcraft_core::error::{PostcraftError, Result};
use postcraft_core::gateway::{ImageUpload, WebhookGateway};
use postcraft_core::recording::{AudioClip, RecordingType};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

const CALENDAR_READ_ACTION: &str = "get_2weeks";

/// Gateway implementation that talks to the automation webhooks over HTTP.
#[derive(Clone)]
pub struct HttpWebhookGateway {
    client: Client,
    content_url: Option<String>,
    calendar_url: Option<String>,
}

impl HttpWebhookGateway {
    pub fn new(
        content_url: Option<String>,
        calendar_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PostcraftError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            content_url,
            calendar_url,
        })
    }

    pub fn from_config(config: &WebhookConfig) -> Result<Self> {
        Self::new(
            config.content_url.clone(),
            config.calendar_url.clone(),
            config.timeout(),
        )
    }

    fn content_url(&self) -> Result<&str> {
        self.content_url
            .as_deref()
            .ok_or_else(|| PostcraftError::config("Missing configuration value: webhook.content_url"))
    }

    fn calendar_url(&self) -> Result<&str> {
        self.calendar_url.as_deref().ok_or_else(|| {
            PostcraftError::config("Missing configuration value: webhook.calendar_url")
        })
    }

    /// Sends a content-endpoint request and returns the parsed body.
    async fn send_content(&self, request: reqwest::RequestBuilder, label: &str) -> Result<Value> {
        let response = request.send().await.map_err(|err| {
            tracing::warn!(action = label, "Webhook request failed: {}", err);
            map_transport_error(err)
        })?;
        let value = read_json_body(response).await?;
        tracing::debug!(action = label, "Webhook responded");
        Ok(value)
    }
}

#[async_trait]
impl WebhookGateway for HttpWebhookGateway {
    async fn generate(&self, request: &GenerateRequest) -> Result<ContentRecord> {
        let url = self.content_url()?;
        let label = request.action.to_string();
        tracing::info!(action = %label, "Sending content request");

        let value = self
            .send_content(self.client.post(url).json(request), &label)
            .await?;
        decode_content_response(value, DecodeMode::Strict)
    }

    async fn upload_image(&self, image: &ImageUpload) -> Result<String> {
        image.ensure_within_limit()?;
        let url = self.content_url()?;
        tracing::info!(file = %image.file_name, bytes = image.size(), "Uploading image");

        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|e| PostcraftError::upload(format!("Invalid file type: {e}")))?;
        let form = Form::new()
            .part("file", part)
            .text("fileName", image.file_name.clone())
            .text("fileType", image.mime_type.clone());

        let value = self
            .send_content(self.client.post(url).multipart(form), "upload_image")
            .await?;
        let object = unwrap_response_object(value)
            .map_err(|e| PostcraftError::upload(format!("Invalid response from server: {e}")))?;

        object
            .get("result_image")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or_else(|| PostcraftError::upload("Invalid response from server: missing result_image"))
    }

    async fn get_calendar(&self) -> Result<Vec<ScheduledPost>> {
        let url = self.calendar_url()?;
        tracing::info!("Fetching calendar");

        let response = self
            .client
            .get(url)
            .query(&[("action", CALENDAR_READ_ACTION)])
            .send()
            .await
            .map_err(|err| {
                tracing::warn!("Calendar request failed: {}", err);
                PostcraftError::calendar_fetch(map_transport_error(err).to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| PostcraftError::calendar_fetch(map_transport_error(err).to_string()))?;

        let mut posts = if status.is_success() {
            match parse_body(&text).map(flatten_encoded) {
                Ok(Value::Array(items)) => posts_from_items(items, TextEncoding::Plain),
                _ => {
                    tracing::warn!(
                        body = %preview(&text),
                        "Calendar response carried no post list, treating it as empty"
                    );
                    Vec::new()
                }
            }
        } else {
            match serde_json::from_str::<Value>(&text) {
                Ok(Value::Array(items)) if !items.is_empty() => {
                    tracing::warn!(
                        status = status.as_u16(),
                        "Calendar endpoint reported an error but returned data; recovering"
                    );
                    posts_from_items(items, TextEncoding::Plain)
                }
                _ => {
                    let error = server_error(status);
                    tracing::warn!(status = status.as_u16(), "Calendar fetch failed");
                    return Err(PostcraftError::calendar_fetch(error.to_string()));
                }
            }
        };

        sort_by_date(&mut posts);
        tracing::info!(count = posts.len(), "Calendar fetched");
        Ok(posts)
    }

    async fn mutate_calendar(
        &self,
        mutation: &CalendarMutation,
    ) -> Result<Option<Vec<ScheduledPost>>> {
        let url = self.calendar_url()?;
        let action = mutation.action_name();
        tracing::info!(action, "Sending calendar mutation");

        let response = self
            .client
            .put(url)
            .json(mutation)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(action, "Calendar mutation failed: {}", err);
                map_transport_error(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(action, status = status.as_u16(), "Calendar mutation rejected");
            return Err(server_error(status));
        }
        if !mutation.returns_posts() {
            return Ok(None);
        }

        let text = response.text().await.map_err(map_transport_error)?;
        match parse_body(&text).map(flatten_encoded) {
            Ok(Value::Array(items)) => Ok(Some(posts_from_items(items, TextEncoding::UriComponent))),
            Ok(_) | Err(_) => {
                tracing::debug!(action, "Calendar mutation returned no post list");
                Ok(None)
            }
        }
    }

    async fn transcribe(&self, clip: &AudioClip, kind: RecordingType) -> Result<ContentRecord> {
        let url = self.content_url()?;
        tracing::info!(kind = %kind, bytes = clip.bytes.len(), "Uploading audio for transcription");

        let part = Part::bytes(clip.bytes.clone())
            .file_name(clip.file_name.clone())
            .mime_str(&clip.mime_type)
            .map_err(|e| PostcraftError::internal(format!("Invalid audio type: {e}")))?;
        let form = Form::new().part("audio", part).text("type", kind.to_string());

        let label = format!("transcribe_{kind}");
        let value = self
            .send_content(self.client.post(url).multipart(form), &label)
            .await?;
        decode_content_response(value, DecodeMode::Lenient)
    }
}

/// Reads a body, failing on non-success statuses.
async fn read_json_body(response: Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "Webhook returned an error status");
        return Err(server_error(status));
    }
    let text = response.text().await.map_err(map_transport_error)?;
    parse_body(&text)
}

/// Parses JSON. Bodies that are not JSON are kept as a string value so the
/// decoder can try them as an encoded payload.
fn parse_body(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PostcraftError::response_format("Empty response from server"));
    }
    Ok(serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string())))
}

/// Decodes a list sent as a JSON string.
fn flatten_encoded(value: Value) -> Value {
    match value {
        Value::String(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        other => other,
    }
}

fn map_transport_error(err: reqwest::Error) -> PostcraftError {
    if let Some(status) = err.status() {
        return server_error(status);
    }
    PostcraftError::network(err.to_string())
}

fn server_error(status: StatusCode) -> PostcraftError {
    PostcraftError::server(status.as_u16(), status.canonical_reason().unwrap_or("Unknown"))
}

fn preview(text: &str) -> String {
    text.chars().take(80).collect()
}
