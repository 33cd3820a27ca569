//! Normalization of the content webhook's heterogeneous response shapes.
//!
//! The automation endpoint answers with either a JSON object, the same object
//! encoded as a JSON string, or an array whose first element is the object.
//! Decoding classifies the payload, unwraps it (one string decode pass at most)
//! and extracts a [`ContentRecord`].

use serde_json::{Map, Value};

use super::model::{ContentRecord, normalize_image_url};
use super::sanitize::sanitize_result_text;
use crate::error::{PostcraftError, Result};

/// How strictly the record fields are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Both `result_text` and `is_news` must be present (generation responses).
    Strict,
    /// Only `result_text` is required; `is_news` defaults to false (transcription).
    Lenient,
}

/// Recognized top-level response shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    Object(Map<String, Value>),
    Encoded(String),
    Wrapped(Vec<Value>),
}

impl ResponseShape {
    pub fn classify(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::Object(map)),
            Value::String(text) => Ok(Self::Encoded(text)),
            Value::Array(items) => Ok(Self::Wrapped(items)),
            other => Err(PostcraftError::response_format(format!(
                "expected an object, a JSON string or an array, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// Unwraps to the inner object.
    fn into_object(self, decode_passes_left: u8) -> Result<Map<String, Value>> {
        match self {
            Self::Object(map) => Ok(map),
            Self::Encoded(text) => {
                if decode_passes_left == 0 {
                    return Err(PostcraftError::response_format(
                        "response is a JSON string nested too deeply",
                    ));
                }
                let inner: Value = serde_json::from_str(text.trim()).map_err(|e| {
                    PostcraftError::response_format(format!("Failed to parse server response: {e}"))
                })?;
                Self::classify(inner)?.into_object(decode_passes_left - 1)
            }
            Self::Wrapped(items) => match items.into_iter().next() {
                Some(Value::Object(map)) => Ok(map),
                Some(other) => Err(PostcraftError::response_format(format!(
                    "array response must wrap an object, found {}",
                    kind_of(&other)
                ))),
                None => Err(PostcraftError::response_format("empty array response")),
            },
        }
    }
}

/// Decodes a webhook response body into a sanitized [`ContentRecord`].
pub fn decode_content_response(value: Value, mode: DecodeMode) -> Result<ContentRecord> {
    let object = unwrap_response_object(value)?;
    record_from_object(&object, mode)
}

/// Unwraps any recognized shape to the inner JSON object.
pub fn unwrap_response_object(value: Value) -> Result<Map<String, Value>> {
    ResponseShape::classify(value)?.into_object(1)
}

fn record_from_object(object: &Map<String, Value>, mode: DecodeMode) -> Result<ContentRecord> {
    let text = match object.get("result_text") {
        Some(Value::String(text)) => Some(text.as_str()),
        Some(Value::Null) | None => None,
        Some(other) => {
            return Err(PostcraftError::response_format(format!(
                "result_text must be a string, found {}",
                kind_of(other)
            )));
        }
    };
    let is_news = match object.get("is_news") {
        Some(value) => parse_flag(value)?,
        None => None,
    };

    let (text, is_news) = match (text, is_news, mode) {
        (Some(text), Some(flag), _) => (text, flag),
        (Some(text), None, DecodeMode::Lenient) => (text, false),
        _ => {
            return Err(PostcraftError::response_format(
                "Missing required data in server response",
            ));
        }
    };

    let image = object
        .get("result_image")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(ContentRecord {
        result_text: sanitize_result_text(text),
        is_news,
        result_image: normalize_image_url(image),
    })
}

/// A present `is_news` key always yields a flag. `null` reads as false and
/// numbers as non-zero.
fn parse_flag(value: &Value) -> Result<Option<bool>> {
    match value {
        Value::Bool(flag) => Ok(Some(*flag)),
        Value::Null => Ok(Some(false)),
        Value::Number(number) => Ok(Some(number.as_f64().is_some_and(|n| n != 0.0))),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(PostcraftError::response_format(format!(
                "is_news must be a boolean, found {text:?}"
            ))),
        },
        other => Err(PostcraftError::response_format(format!(
            "is_news must be a boolean, found {}",
            kind_of(other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
