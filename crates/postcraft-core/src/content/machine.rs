//! Pure state transitions for the content flow.
//!
//! `ContentMachine` owns everything the generator screen shows: status, form
//! fields, draft, image and the scheduling/regeneration context. It performs no
//! I/O; the application layer drives it around webhook calls.

use chrono::NaiveDate;

use super::action::{ContentAction, RegenerateOptions};
use super::model::{ContentRecord, FormField, FormInputs, normalize_image_url};
use super::request::GenerateRequest;
use super::sanitize::strip_markdown_for_copy;
use super::state::{ContentState, InFlight};
use crate::error::{PostcraftError, Result};

/// Handle for one in-flight request, returned by [`ContentMachine::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub id: u64,
    pub action: InFlight,
}

/// Where a completed record was routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    NewsField,
    Draft,
}

#[derive(Debug, Clone, Default)]
pub struct ContentMachine {
    state: ContentState,
    form: FormInputs,
    draft: String,
    image: Option<String>,
    scheduled_date: Option<NaiveDate>,
    regenerate_options: RegenerateOptions,
    next_ticket: u64,
}

impl ContentMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the start-up state from a cached record.
    pub fn rehydrated(record: Option<ContentRecord>) -> Self {
        let mut machine = Self::new();
        if let Some(record) = record {
            machine.apply_record(record);
        }
        machine
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn state(&self) -> &ContentState {
        &self.state
    }

    pub fn form(&self) -> &FormInputs {
        &self.form
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn scheduled_date(&self) -> Option<NaiveDate> {
        self.scheduled_date
    }

    pub fn regenerate_options(&self) -> RegenerateOptions {
        self.regenerate_options
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Text shown in the markdown preview: the draft, else the record text.
    pub fn preview_text(&self) -> Option<&str> {
        if !self.draft.trim().is_empty() {
            return Some(&self.draft);
        }
        self.state
            .record()
            .map(|record| record.result_text.as_str())
            .filter(|text| !text.trim().is_empty())
    }

    /// Plain-text rendition of the preview for the clipboard.
    pub fn copy_text(&self) -> String {
        self.preview_text()
            .map(strip_markdown_for_copy)
            .unwrap_or_default()
    }

    // ============================================================================
    // Direct input
    // ============================================================================

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn set_scheduled_date(&mut self, date: Option<NaiveDate>) {
        self.scheduled_date = date;
    }

    pub fn set_regenerate_options(&mut self, options: RegenerateOptions) {
        self.regenerate_options = options;
    }

    // ============================================================================
    // Transitions
    // ============================================================================

    /// `Idle | Loaded | Failed -> Loading(action)`.
    ///
    /// Rejected with `Busy` while another request is in flight.
    pub fn begin(&mut self, action: impl Into<InFlight>) -> Result<RequestTicket> {
        let action = action.into();
        if let Some(active) = self.state.loading_action() {
            return Err(PostcraftError::busy(active.to_string()));
        }

        self.next_ticket += 1;
        let previous = self.state.record().cloned();
        self.state = ContentState::Loading { action, previous };

        Ok(RequestTicket {
            id: self.next_ticket,
            action,
        })
    }

    /// Payload for a generation-family action, built from the current context.
    pub fn request_for(&self, action: ContentAction) -> GenerateRequest {
        let image_url = self
            .state
            .record()
            .and_then(|record| record.result_image.clone())
            .or_else(|| self.image.clone());

        GenerateRequest::new(action, self.form.clone(), self.draft.clone())
            .with_image_url(image_url)
            .with_scheduled_date(self.scheduled_date)
            .with_regenerate_options(self.regenerate_options)
    }

    /// `Loading -> Loaded`, routing the text by `is_news`.
    ///
    /// Completions are applied in arrival order whatever the current state, so
    /// the latest arrival wins.
    pub fn complete(&mut self, _ticket: RequestTicket, record: ContentRecord) -> Routed {
        self.apply_record(record)
    }

    /// Completion of an image upload: the image changes, the text does not.
    pub fn complete_upload(&mut self, _ticket: RequestTicket, image_url: String) {
        self.image = normalize_image_url(Some(image_url));
        self.state = match self.state.record().cloned() {
            Some(mut record) => {
                record.result_image = self.image.clone();
                ContentState::Loaded(record)
            }
            None => ContentState::Idle,
        };
    }

    /// `Loading -> Failed`. Form, draft and image are left untouched.
    pub fn fail(&mut self, ticket: RequestTicket, error: PostcraftError) {
        let previous = self.state.record().cloned();
        self.state = ContentState::Failed {
            action: ticket.action,
            error,
            previous,
        };
    }

    /// Any state `-> Idle`, clearing every field.
    pub fn reset(&mut self) {
        let next_ticket = self.next_ticket;
        *self = Self {
            next_ticket,
            ..Self::default()
        };
    }

    fn apply_record(&mut self, record: ContentRecord) -> Routed {
        let routed = if record.is_news {
            self.form.news = record.result_text.clone();
            Routed::NewsField
        } else {
            self.draft = record.result_text.clone();
            Routed::Draft
        };

        if let Some(image) = &record.result_image {
            self.image = Some(image.clone());
        }

        self.state = ContentState::Loaded(record);
        routed
    }
}
