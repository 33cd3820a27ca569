//! Outbound payload for generation-family webhook calls.

use chrono::NaiveDate;
use serde::Serialize;

use super::action::{ContentAction, RegenerateOptions};
use super::model::FormInputs;

/// JSON body sent to the content webhook.
///
/// Form fields are flattened to the top level next to the action and context.
/// `image_url` and `scheduled_date` are always present, as `null` when unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub form: FormInputs,
    pub action: ContentAction,
    pub draft: String,
    pub image_url: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    #[serde(rename = "reGenerateOptions", skip_serializing_if = "Option::is_none")]
    pub regenerate_options: Option<RegenerateOptions>,
}

impl GenerateRequest {
    pub fn new(action: ContentAction, form: FormInputs, draft: impl Into<String>) -> Self {
        Self {
            form,
            action,
            draft: draft.into(),
            image_url: None,
            scheduled_date: None,
            regenerate_options: None,
        }
    }

    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    pub fn with_scheduled_date(mut self, date: Option<NaiveDate>) -> Self {
        self.scheduled_date = date;
        self
    }

    /// Attaches regeneration options. Ignored for every action except `re-generate`.
    pub fn with_regenerate_options(mut self, options: RegenerateOptions) -> Self {
        if self.action == ContentAction::Regenerate {
            self.regenerate_options = Some(options);
        }
        self
    }
}
