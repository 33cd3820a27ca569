//! Calendar write requests.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::encoding::encode_component;
use super::model::{PostId, ScheduledPost};
use crate::error::{PostcraftError, Result};

/// Title given to posts scheduled from the content flow.
pub const SCHEDULED_POST_TITLE: &str = "Scheduled Post";

/// Body of a calendar `PUT`, discriminated by `action`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CalendarMutation {
    Remove {
        date: Option<NaiveDate>,
    },
    AddItem {
        date: NaiveDate,
        content: String,
        image_url: String,
        title: String,
    },
    /// `title` and `content` are percent-encoded.
    Reschedule {
        date: Option<NaiveDate>,
        new_date: NaiveDate,
        post_id: Option<PostId>,
        title: String,
        content: String,
    },
}

impl CalendarMutation {
    /// Removal is keyed by the post's current date.
    pub fn remove(post: &ScheduledPost) -> Self {
        Self::Remove { date: post.date }
    }

    pub fn add_item(date: NaiveDate, content: impl Into<String>, image_url: Option<String>) -> Self {
        Self::AddItem {
            date,
            content: content.into(),
            image_url: image_url.unwrap_or_default(),
            title: SCHEDULED_POST_TITLE.to_string(),
        }
    }

    pub fn reschedule(post: &ScheduledPost, new_date: NaiveDate) -> Self {
        Self::Reschedule {
            date: post.date,
            new_date,
            post_id: post.id.clone(),
            title: encode_component(post.title.as_deref().unwrap_or_default()),
            content: encode_component(post.content.as_deref().unwrap_or_default()),
        }
    }

    pub fn action_name(&self) -> &'static str {
        match self {
            Self::Remove { .. } => "remove",
            Self::AddItem { .. } => "add_item",
            Self::Reschedule { .. } => "reschedule",
        }
    }

    /// Only reschedule responses carry an updated post list.
    pub fn returns_posts(&self) -> bool {
        matches!(self, Self::Reschedule { .. })
    }
}

/// Scheduling accepts dates from yesterday onward.
pub fn validate_schedule_date(date: NaiveDate, today: NaiveDate) -> Result<()> {
    let earliest = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    if date < earliest {
        return Err(PostcraftError::validation(format!(
            "Cannot schedule a post on {date}: dates before {earliest} are not allowed"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::model::PostStatus;
    use serde_json::json;

    fn date(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
    }

    fn post() -> ScheduledPost {
        ScheduledPost {
            id: Some(PostId::Number(12)),
            date: Some(date("2024-01-05")),
            status: PostStatus::Planned,
            title: Some("Hello, World!".into()),
            content: Some("A & B".into()),
            summary: None,
            image_url: None,
        }
    }

    #[test]
    fn test_remove_body() {
        let body = serde_json::to_value(CalendarMutation::remove(&post())).unwrap();
        assert_eq!(body, json!({"action": "remove", "date": "2024-01-05"}));
    }

    #[test]
    fn test_add_item_body() {
        let mutation = CalendarMutation::add_item(date("2024-02-01"), "Post body", None);
        let body = serde_json::to_value(&mutation).unwrap();
        assert_eq!(
            body,
            json!({
                "action": "add_item",
                "date": "2024-02-01",
                "content": "Post body",
                "image_url": "",
                "title": "Scheduled Post"
            })
        );
        assert!(!mutation.returns_posts());
    }

    #[test]
    fn test_reschedule_body_encodes_text() {
        let mutation = CalendarMutation::reschedule(&post(), date("2024-01-10"));
        let body = serde_json::to_value(&mutation).unwrap();
        assert_eq!(
            body,
            json!({
                "action": "reschedule",
                "date": "2024-01-05",
                "new_date": "2024-01-10",
                "post_id": 12,
                "title": "Hello%2C%20World!",
                "content": "A%20%26%20B"
            })
        );
        assert!(mutation.returns_posts());
        assert_eq!(mutation.action_name(), "reschedule");
    }

    #[test]
    fn test_schedule_date_window() {
        let today = date("2024-03-10");
        assert!(validate_schedule_date(date("2024-03-09"), today).is_ok());
        assert!(validate_schedule_date(date("2024-03-10"), today).is_ok());
        assert!(validate_schedule_date(date("2025-01-01"), today).is_ok());

        let err = validate_schedule_date(date("2024-03-08"), today).unwrap_err();
        assert!(matches!(err, PostcraftError::Validation(_)));
    }
}
