//! Scheduled post domain models.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Publication status of a scheduled post.
///
/// Unknown statuses from the endpoint are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PostStatus {
    Planned,
    Ready,
    Done,
    Removed,
    Other(String),
}

impl PostStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Planned => "planned",
            Self::Ready => "ready",
            Self::Done => "done",
            Self::Removed => "removed",
            Self::Other(status) => status,
        }
    }

    /// Removed posts are hidden from every list and grid view.
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Removed)
    }

    /// Reschedule and remove are offered for everything not yet published.
    pub fn allows_changes(&self) -> bool {
        !matches!(self, Self::Done)
    }
}

impl From<String> for PostStatus {
    fn from(status: String) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "planned" => Self::Planned,
            "ready" => Self::Ready,
            "done" => Self::Done,
            "removed" => Self::Removed,
            _ => Self::Other(status),
        }
    }
}

impl From<PostStatus> for String {
    fn from(status: PostStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque post identifier. Kept in the JSON type the endpoint used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Number(i64),
    Text(String),
}

impl PostId {
    /// Compares against user-supplied text such as a CLI argument.
    pub fn matches(&self, text: &str) -> bool {
        self.to_string() == text.trim()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<&str> for PostId {
    fn from(text: &str) -> Self {
        text.trim()
            .parse::<i64>()
            .map(Self::Number)
            .unwrap_or_else(|_| Self::Text(text.trim().to_string()))
    }
}

/// One calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPost {
    pub id: Option<PostId>,
    /// `None` when the endpoint sent no date or an unparseable one.
    pub date: Option<NaiveDate>,
    pub status: PostStatus,
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
}

impl ScheduledPost {
    /// Display date such as `Jan 05, 2024`, or `No date`.
    pub fn formatted_date(&self) -> String {
        self.date
            .map(|date| date.format("%b %d, %Y").to_string())
            .unwrap_or_else(|| "No date".to_string())
    }

    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or("Untitled")
    }

    pub fn has_id(&self, id: &PostId) -> bool {
        self.id.as_ref() == Some(id)
    }
}

/// Parses the date formats the endpoint has been seen to send.
///
/// Accepts `2024-01-05`, RFC 3339 timestamps and naive ISO date-times.
pub fn parse_post_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|timestamp| timestamp.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_keeps_unknown_values() {
        let status: PostStatus = serde_json::from_value(serde_json::json!("Ready")).unwrap();
        assert_eq!(status, PostStatus::Ready);

        let status: PostStatus = serde_json::from_value(serde_json::json!("draft")).unwrap();
        assert_eq!(status, PostStatus::Other("draft".into()));
        assert_eq!(serde_json::to_value(&status).unwrap(), "draft");
    }

    #[test]
    fn test_status_rules() {
        assert!(!PostStatus::Removed.is_visible());
        assert!(PostStatus::Done.is_visible());
        assert!(!PostStatus::Done.allows_changes());
        assert!(PostStatus::Planned.allows_changes());
    }

    #[test]
    fn test_post_id_accepts_numbers_and_strings() {
        let id: PostId = serde_json::from_value(serde_json::json!(42)).unwrap();
        assert_eq!(id, PostId::Number(42));
        assert!(id.matches("42"));

        let id: PostId = serde_json::from_value(serde_json::json!("rec_9")).unwrap();
        assert_eq!(id, PostId::Text("rec_9".into()));
        assert_eq!(PostId::from(" 7 "), PostId::Number(7));
    }

    #[test]
    fn test_parse_post_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5);
        assert_eq!(parse_post_date("2024-01-05"), expected);
        assert_eq!(parse_post_date("2024-01-05T10:30:00Z"), expected);
        assert_eq!(parse_post_date("2024-01-05T10:30:00.000+02:00"), expected);
        assert_eq!(parse_post_date("2024-01-05T10:30:00"), expected);
        assert_eq!(parse_post_date("not a date"), None);
        assert_eq!(parse_post_date(""), None);
    }

    #[test]
    fn test_formatted_date() {
        let mut post = ScheduledPost {
            id: None,
            date: NaiveDate::from_ymd_opt(2024, 1, 5),
            status: PostStatus::Planned,
            title: None,
            content: None,
            summary: None,
            image_url: None,
        };
        assert_eq!(post.formatted_date(), "Jan 05, 2024");
        assert_eq!(post.display_title(), "Untitled");

        post.date = None;
        assert_eq!(post.formatted_date(), "No date");
    }
}
