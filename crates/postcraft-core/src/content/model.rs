//! Content domain models.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The canonical unit of generated content.
///
/// Field names match the webhook payload and the session cache entry, so the
/// same serialized form is used on the wire and on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Sanitized markdown body.
    pub result_text: String,
    /// When true the text belongs in the news field instead of the draft.
    pub is_news: bool,
    /// URL of an associated image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_image: Option<String>,
}

impl ContentRecord {
    pub fn new(result_text: impl Into<String>, is_news: bool) -> Self {
        Self {
            result_text: result_text.into(),
            is_news,
            result_image: None,
        }
    }

    /// Attaches an image URL. Blank URLs are treated as no image.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.result_image = normalize_image_url(Some(url.into()));
        self
    }

    pub fn has_image(&self) -> bool {
        self.result_image.is_some()
    }
}

/// Maps empty or whitespace-only URLs to `None`.
pub fn normalize_image_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

/// The four free-text input fields.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FormField {
    News,
    Personal,
    Controversial,
    Projects,
}

/// User-owned form inputs. Mutated only by direct input and cleared together on reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInputs {
    pub news: String,
    pub personal: String,
    pub controversial: String,
    pub projects: String,
}

impl FormInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::News => &self.news,
            FormField::Personal => &self.personal,
            FormField::Controversial => &self.controversial,
            FormField::Projects => &self.projects,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::News => &mut self.news,
            FormField::Personal => &mut self.personal,
            FormField::Controversial => &mut self.controversial,
            FormField::Projects => &mut self.projects,
        };
        *slot = value.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.news.is_empty()
            && self.personal.is_empty()
            && self.controversial.is_empty()
            && self.projects.is_empty()
    }
}
